use readtrim::config::MAX_BLOCK_SIZE;
use readtrim::{
    ChainError, ConfigError, Engine, EngineOutput, Error, FastqReader, FastqRecord, OutputSinks,
    Pipeline, PipelineConfig, ReaderOptions, SerialEngine, TrimLogWriter, Trimmer, TrimmerChain,
    UnitSource, Verdict,
};
use std::fmt;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

const CHAIN: &[&str] = &["LEADING:3", "TRAILING:3", "SLIDINGWINDOW:15:4", "MINLEN:20"];

/// Deterministic pseudo-random FASTQ text with a mix of good and poor reads.
fn synthetic_fastq(reads: usize, seed: u64, mate: u8) -> Vec<u8> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };
    let mut out = Vec::new();
    for i in 0..reads {
        let len = 20 + (next() % 80) as usize;
        let poor = next() % 4 == 0;
        let seq: String = (0..len)
            .map(|_| match next() % 20 {
                0 => 'N',
                n => ['A', 'C', 'G', 'T'][(n % 4) as usize],
            })
            .collect();
        let qual: String = (0..len)
            .map(|_| {
                let q = if poor { next() % 20 } else { 10 + next() % 31 };
                char::from(33 + q as u8)
            })
            .collect();
        out.extend_from_slice(format!("@read{i}/{mate} sample\n{seq}\n+\n{qual}\n").as_bytes());
    }
    out
}

fn reader(data: Vec<u8>) -> FastqReader {
    FastqReader::from_bufread(Cursor::new(data), ReaderOptions::default())
}

fn single_source(data: &[u8]) -> UnitSource {
    UnitSource::single(reader(data.to_vec()))
}

fn paired_source(forward: &[u8], reverse: &[u8]) -> UnitSource {
    UnitSource::paired(reader(forward.to_vec()), reader(reverse.to_vec()))
}

fn single_sinks() -> OutputSinks<Vec<u8>> {
    OutputSinks::single(Vec::new())
}

fn paired_sinks() -> OutputSinks<Vec<u8>> {
    OutputSinks::paired(Vec::new(), Vec::new(), Vec::new(), Vec::new())
}

fn chain(specs: &[&str]) -> Arc<TrimmerChain> {
    Arc::new(TrimmerChain::from_specs(specs).unwrap())
}

struct Collected {
    outputs: Vec<Vec<u8>>,
    trim_log: Vec<u8>,
    summary: String,
    input: u64,
    surviving: u64,
}

fn collect(output: EngineOutput<Vec<u8>, Vec<u8>>) -> Collected {
    let summary = output.stats.to_string();
    let input = output.stats.input;
    let surviving = output.stats.surviving();
    Collected {
        outputs: output.sinks.into_writers().unwrap(),
        trim_log: output.trim_log.unwrap().into_inner().unwrap(),
        summary,
        input,
        surviving,
    }
}

fn run<E: Engine>(
    engine: &E,
    source: UnitSource,
    chain: Arc<TrimmerChain>,
    sinks: OutputSinks<Vec<u8>>,
) -> readtrim::Result<Collected> {
    engine
        .run(source, chain, sinks, Some(TrimLogWriter::new(Vec::new())))
        .map(collect)
}

fn pipeline(threads: usize, block_size: usize) -> Pipeline {
    Pipeline::new(PipelineConfig::new(threads).with_block_size(block_size)).unwrap()
}

#[test]
fn pipeline_matches_serial_engine_single_end() {
    let data = synthetic_fastq(2_500, 7, 1);
    let expected = run(&SerialEngine, single_source(&data), chain(CHAIN), single_sinks()).unwrap();
    assert_eq!(expected.input, 2_500);
    assert!(expected.surviving > 0 && expected.surviving < 2_500);

    for (threads, block_size) in [(1, 1), (2, 7), (4, 100), (8, 1000), (3, 5000)] {
        let got = run(
            &pipeline(threads, block_size),
            single_source(&data),
            chain(CHAIN),
            single_sinks(),
        )
        .unwrap();
        assert_eq!(got.outputs, expected.outputs, "threads={threads} block={block_size}");
        assert_eq!(got.trim_log, expected.trim_log, "threads={threads} block={block_size}");
        assert_eq!(got.summary, expected.summary);
    }
}

#[test]
fn pipeline_matches_serial_engine_paired_end() {
    let forward = synthetic_fastq(1_200, 11, 1);
    let reverse = synthetic_fastq(1_200, 13, 2);
    let source = paired_source(&forward, &reverse);
    let expected = run(&SerialEngine, source, chain(CHAIN), paired_sinks()).unwrap();
    assert!(expected.summary.starts_with("Input Read Pairs: 1200 "));

    for (threads, block_size) in [(2, 1), (4, 64), (6, 333)] {
        let got = run(
            &pipeline(threads, block_size),
            paired_source(&forward, &reverse),
            chain(CHAIN),
            paired_sinks(),
        )
        .unwrap();
        assert_eq!(got.outputs, expected.outputs, "threads={threads} block={block_size}");
        assert_eq!(got.trim_log, expected.trim_log);
        assert_eq!(got.summary, expected.summary);
    }
}

#[test]
fn empty_chain_round_trips_input() {
    let data = synthetic_fastq(500, 3, 1);
    let got = run(&pipeline(4, 16), single_source(&data), chain(&[]), single_sinks()).unwrap();
    assert_eq!(got.outputs, vec![data]);
    assert_eq!(got.summary, "Input Reads: 500 Surviving: 500 (100.00%) Dropped: 0 (0.00%)");
}

#[test]
fn empty_input_produces_empty_outputs() {
    let got = run(&pipeline(2, 10), single_source(b""), chain(CHAIN), single_sinks()).unwrap();
    assert_eq!(got.outputs, vec![Vec::<u8>::new()]);
    assert!(got.trim_log.is_empty());
    assert_eq!(got.input, 0);
    assert_eq!(got.summary, "Input Reads: 0 Surviving: 0 (0.00%) Dropped: 0 (0.00%)");
}

#[test]
fn paired_reads_are_routed_by_fate() {
    let forward = b"@p1/1\nACGTACGT\n+\nIIIIIIII\n\
                    @p2/1\nACGTACGT\n+\nIIIIIIII\n\
                    @p3/1\nACG\n+\nIII\n\
                    @p4/1\nACG\n+\nIII\n";
    let reverse = b"@p1/2\nTTTTTTTT\n+\nIIIIIIII\n\
                    @p2/2\nTTT\n+\nIII\n\
                    @p3/2\nTTTTTTTT\n+\nIIIIIIII\n\
                    @p4/2\nTTT\n+\nIII\n";
    let source = paired_source(forward, reverse);
    let got = run(&pipeline(2, 1), source, chain(&["MINLEN:5"]), paired_sinks()).unwrap();

    let [fwd_paired, fwd_unpaired, rev_paired, rev_unpaired] =
        <[Vec<u8>; 4]>::try_from(got.outputs).unwrap();
    assert_eq!(fwd_paired, b"@p1/1\nACGTACGT\n+\nIIIIIIII\n");
    assert_eq!(rev_paired, b"@p1/2\nTTTTTTTT\n+\nIIIIIIII\n");
    assert_eq!(fwd_unpaired, b"@p2/1\nACGTACGT\n+\nIIIIIIII\n");
    assert_eq!(rev_unpaired, b"@p3/2\nTTTTTTTT\n+\nIIIIIIII\n");
    assert_eq!(
        got.summary,
        "Input Read Pairs: 4 Both Surviving: 1 (25.00%) Forward Only Surviving: 1 (25.00%) \
         Reverse Only Surviving: 1 (25.00%) Dropped: 1 (25.00%)"
    );
}

#[test]
fn trim_log_reports_positions_in_the_untrimmed_read() {
    // qualities: '+' = 10, 'I' = 40
    let data = b"@kept one\nAACCGGTT\n+\n++IIII++\n\
                 @gone\nACGT\n+\n++++\n\
                 @whole\nACGT\n+\nIIII\n";
    let got = run(
        &pipeline(3, 2),
        single_source(data),
        chain(&["LEADING:20", "TRAILING:20"]),
        single_sinks(),
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(got.trim_log).unwrap(),
        "kept one 4 2 6 2\ngone 0 0 0 0\nwhole 4 0 4 0\n"
    );
    assert_eq!(got.outputs[0], b"@kept one\nCCGG\n+\nIIII\n@whole\nACGT\n+\nIIII\n");
}

#[test]
fn malformed_input_fails_the_run() {
    let mut data = synthetic_fastq(300, 5, 1);
    data.extend_from_slice(b"@broken\nACGT\n+\nII\n");
    data.extend_from_slice(&synthetic_fastq(300, 6, 1));

    let serial = run(&SerialEngine, single_source(&data), chain(CHAIN), single_sinks());
    assert!(matches!(serial, Err(Error::Fastq(_))));
    for threads in [2, 4] {
        let res = run(&pipeline(threads, 10), single_source(&data), chain(CHAIN), single_sinks());
        assert!(matches!(res, Err(Error::Fastq(_))), "threads={threads}");
    }
}

#[test]
fn unpaired_input_fails_the_run() {
    let forward = synthetic_fastq(50, 1, 1);
    let reverse = synthetic_fastq(49, 2, 2);
    let res = run(&pipeline(2, 8), paired_source(&forward, &reverse), chain(CHAIN), paired_sinks());
    assert!(matches!(res, Err(Error::UnpairedInput { ended: 1 })));
}

#[derive(Debug)]
struct FailOn(&'static str);

impl fmt::Display for FailOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FAILON:{}", self.0)
    }
}

impl Trimmer for FailOn {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        if record.id() == self.0 {
            Verdict::Trim {
                start: 0,
                length: record.len() + 1,
            }
        } else {
            Verdict::Keep
        }
    }
}

#[test]
fn trimmer_failure_stops_the_pipeline() {
    let data = synthetic_fastq(2_000, 9, 1);
    let chain = Arc::new(TrimmerChain::new(vec![Box::new(FailOn("read1234/1"))]));
    let res = run(&pipeline(4, 50), single_source(&data), chain, single_sinks());
    match res {
        Err(Error::Chain(ChainError { trimmer, read, .. })) => {
            assert_eq!(trimmer, "FAILON:read1234/1");
            assert_eq!(read, "read1234/1 sample");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("run should fail"),
    }
}

/// Output that stays readable after the engine has dropped its writer.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read numbers of `@read<i>/1` headers (output) or `read<i>/1` lines (trim log).
fn read_numbers(text: &str, prefix: &str) -> Vec<usize> {
    text.lines()
        .filter_map(|line| line.strip_prefix(prefix))
        .filter_map(|rest| rest.split('/').next()?.parse().ok())
        .collect()
}

/// Run a chain that fails on `read1234/1`; returns the error and what reached the
/// output and the trim log before the run stopped.
fn run_until_failure<E: Engine>(engine: &E, data: &[u8]) -> (Error, String, String) {
    let output = SharedBuf::default();
    let log = SharedBuf::default();
    let chain = Arc::new(TrimmerChain::new(vec![Box::new(FailOn("read1234/1"))]));
    let res = engine.run(
        single_source(data),
        chain,
        OutputSinks::single(output.clone()),
        Some(TrimLogWriter::new(log.clone())),
    );
    let Err(err) = res else {
        panic!("run should fail");
    };
    (err, output.text(), log.text())
}

#[test]
fn nothing_is_written_after_a_failing_read() {
    let data = synthetic_fastq(2_000, 9, 1);

    let (err, output, log) = run_until_failure(&SerialEngine, &data);
    assert!(matches!(err, Error::Chain(_)));
    assert_eq!(read_numbers(&output, "@read"), (0..1234).collect::<Vec<_>>());
    assert_eq!(read_numbers(&log, "read"), (0..1234).collect::<Vec<_>>());

    for (threads, block_size) in [(2, 7), (4, 50)] {
        let (err, output, log) = run_until_failure(&pipeline(threads, block_size), &data);
        assert!(matches!(err, Error::Chain(_)), "threads={threads}");
        let written = read_numbers(&output, "@read");
        // every block before the failing one, and nothing from it or after it
        let complete = 1234 / block_size * block_size;
        assert_eq!(written, (0..complete).collect::<Vec<_>>(), "threads={threads}");
        assert_eq!(read_numbers(&log, "read"), written, "threads={threads}");
    }
}

#[test]
fn pipeline_rejects_invalid_config() {
    let configured = pipeline(3, 10);
    assert_eq!(configured.config().task_queue_capacity(), 6);
    assert_eq!(configured.config().consumer_queue_capacity(), 15);
    assert!(Pipeline::new(PipelineConfig::new(0)).is_err());
    assert!(Pipeline::new(PipelineConfig::new(2).with_block_size(0)).is_err());
    assert!(matches!(
        Pipeline::new(PipelineConfig::new(2).with_block_size(MAX_BLOCK_SIZE + 1)),
        Err(Error::Config(ConfigError::BlockSizeTooLarge { .. }))
    ));
    assert!(matches!(
        Pipeline::new(PipelineConfig::new(usize::MAX)),
        Err(Error::Config(ConfigError::TooManyThreads { .. }))
    ));
    assert_eq!(PipelineConfig::new(usize::MAX).consumer_queue_capacity(), usize::MAX);
}

#[test]
fn oversized_block_request_reads_what_is_there() {
    let mut source = single_source(b"@only\nACGT\n+\nIIII\n");
    let block = source.next_block(0, 1 << 40).unwrap();
    assert_eq!(block.units.len(), 1);
    assert!(source.next_block(1, 1 << 40).unwrap().is_sentinel());
}
