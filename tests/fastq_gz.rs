use readtrim::{FastqReader, ReaderOptions, Source};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

#[cfg(feature = "gzip")]
#[test]
fn parse_gz_file_single_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.fastq.gz");
    {
        let f = File::create(&path).unwrap();
        let mut enc = flate2::write::GzEncoder::new(f, flate2::Compression::fast());
        writeln!(enc, "@x").unwrap();
        writeln!(enc, "ACGT").unwrap();
        writeln!(enc, "+").unwrap();
        writeln!(enc, "!!!!").unwrap();
        enc.finish().unwrap();
    }

    let mut fq = FastqReader::from_path(&path, ReaderOptions::default()).expect("open gz");
    assert!(matches!(fq.source(), Source::Path(p) if p == &path));

    let rec = fq.next().unwrap().unwrap();
    assert_eq!(rec.name(), "x");
    assert_eq!(rec.sequence(), b"ACGT");
    assert_eq!(rec.quality(), b"!!!!");
    assert!(fq.next().is_none());
}

#[cfg(feature = "gzip")]
#[test]
fn gzip_detected_by_magic_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.fq");
    {
        let f = File::create(&path).unwrap();
        let mut enc = flate2::write::GzEncoder::new(f, flate2::Compression::fast());
        write!(enc, "@y\nGG\n+\nII\n").unwrap();
        enc.finish().unwrap();
    }

    let mut fq = FastqReader::from_path(&path, ReaderOptions::default()).unwrap();
    let rec = fq.next().unwrap().unwrap();
    assert_eq!(rec.name(), "y");
    assert_eq!(rec.sequence(), b"GG");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let res = FastqReader::from_path(dir.path().join("absent.fq"), ReaderOptions::default());
    assert!(matches!(res, Err(readtrim::FastqError::Io { .. })));
}
