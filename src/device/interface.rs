use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, StdinLock},
};

/// Read-only [Interface] to the RANGEA stream
pub enum Interface {
    /// [Interface::Stdin] when no input file is specified
    Stdin(StdinLock<'static>),

    /// Plain text file
    File(BufReader<File>),

    /// Gzip compressed text file
    Gzip(BufReader<GzDecoder<File>>),
}

impl Interface {
    pub fn from_stdin() -> Self {
        Self::Stdin(std::io::stdin().lock())
    }

    /// Creates a new read-only interface, gzip compressed files
    /// are identified by their ".gz" extension.
    pub fn open_file(fullpath: &str) -> std::io::Result<Self> {
        let handle = File::open(fullpath)?;

        if fullpath.ends_with(".gz") {
            Ok(Self::from_gzip_file_handle(handle))
        } else {
            Ok(Self::from_file_handle(handle))
        }
    }

    pub fn from_file_handle(handle: File) -> Self {
        Self::File(BufReader::new(handle))
    }

    pub fn from_gzip_file_handle(handle: File) -> Self {
        Self::Gzip(BufReader::new(GzDecoder::new(handle)))
    }
}

impl Read for Interface {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdin(r) => r.read(buf),
            Self::File(r) => r.read(buf),
            Self::Gzip(r) => r.read(buf),
        }
    }
}

impl BufRead for Interface {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        match self {
            Self::Stdin(r) => r.fill_buf(),
            Self::File(r) => r.fill_buf(),
            Self::Gzip(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Stdin(r) => r.consume(amt),
            Self::File(r) => r.consume(amt),
            Self::Gzip(r) => r.consume(amt),
        }
    }
}
