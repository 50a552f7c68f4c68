use flate2::{Compression, write::GzEncoder};
use std::{
    fs::File,
    io::{Stdout, Write},
};

/// RINEX output handle
pub enum FileDescriptor {
    Plain(File),
    Gzip(GzEncoder<File>),
    Stdout(Stdout),
}

impl std::io::Write for FileDescriptor {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(data),
            Self::Gzip(w) => w.write(data),
            Self::Stdout(w) => w.write(data),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
            Self::Stdout(w) => w.flush(),
        }
    }
}

impl FileDescriptor {
    /// Creates (or truncates) the output file
    pub fn new(gzip: bool, filename: &str) -> std::io::Result<Self> {
        let fd = File::create(filename)?;

        if gzip {
            let compression = Compression::new(5);
            Ok(Self::Gzip(GzEncoder::new(fd, compression)))
        } else {
            Ok(Self::Plain(fd))
        }
    }

    pub fn stdout() -> Self {
        Self::Stdout(std::io::stdout())
    }

    /// Flushes pending content, terminates the gzip stream
    pub fn finish(self) -> std::io::Result<()> {
        match self {
            Self::Plain(mut w) => w.flush(),
            Self::Gzip(w) => w.finish().map(|_| ()),
            Self::Stdout(mut w) => w.flush(),
        }
    }
}
