use criterion::{Criterion, criterion_group, criterion_main};
use readtrim::{
    Engine, FastqReader, OutputSinks, Pipeline, PipelineConfig, ReaderOptions, SerialEngine,
    TrimLogWriter, TrimmerChain, UnitSource,
};
use std::io::{BufReader, Cursor};
use std::sync::Arc;

fn input() -> Vec<u8> {
    let mut data = String::new();
    for i in 0..20_000 {
        let tail = "#".repeat(i % 30);
        let head = "I".repeat(100 - tail.len());
        data.push_str(&format!(
            "@r{i}\n{}\n+\n{head}{tail}\n",
            "ACGTACGTAC".repeat(10)
        ));
    }
    data.into_bytes()
}

fn source(data: &[u8]) -> UnitSource {
    UnitSource::single(FastqReader::from_bufread(
        BufReader::new(Cursor::new(data.to_vec())),
        ReaderOptions::default(),
    ))
}

fn bench_trim(c: &mut Criterion) {
    let data = input();
    let chain = Arc::new(
        TrimmerChain::from_specs(["LEADING:3", "TRAILING:3", "SLIDINGWINDOW:15:4", "MINLEN:36"])
            .unwrap(),
    );

    c.bench_function("trim_20000_serial", |b| {
        b.iter(|| {
            let out = SerialEngine
                .run(
                    source(&data),
                    Arc::clone(&chain),
                    OutputSinks::single(Vec::<u8>::new()),
                    None::<TrimLogWriter<Vec<u8>>>,
                )
                .unwrap();
            out.stats.surviving()
        })
    });

    for threads in [2, 4] {
        let pipeline = Pipeline::new(PipelineConfig::new(threads)).unwrap();
        c.bench_function(&format!("trim_20000_pipeline_{threads}"), |b| {
            b.iter(|| {
                let out = pipeline
                    .run(
                        source(&data),
                        Arc::clone(&chain),
                        OutputSinks::single(Vec::<u8>::new()),
                        None::<TrimLogWriter<Vec<u8>>>,
                    )
                    .unwrap();
                out.stats.surviving()
            })
        });
    }
}

criterion_group!(benches, bench_trim);
criterion_main!(benches);
