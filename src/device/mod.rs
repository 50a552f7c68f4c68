use log::{debug, error};

use std::{collections::VecDeque, io::BufRead};

mod interface;

use interface::Interface;

/// [Device] streams text lines from one or several [Interface]s,
/// consumed in order.
pub struct Device {
    /// Pending [Interface]s, with their name
    interfaces: VecDeque<(String, Interface)>,
    buf: Vec<u8>,
}

impl Device {
    /// Streams standard input
    pub fn stdin() -> Self {
        Self {
            interfaces: VecDeque::from([("stdin".to_string(), Interface::from_stdin())]),
            buf: Vec::with_capacity(1024),
        }
    }

    /// Opens the first input file
    pub fn open_file(fullpath: &str) -> std::io::Result<Self> {
        let mut device = Self {
            interfaces: VecDeque::with_capacity(1),
            buf: Vec::with_capacity(1024),
        };

        device.stack_file(fullpath)?;
        Ok(device)
    }

    /// Stacks one more input file, consumed once all previous content is exhausted
    pub fn stack_file(&mut self, fullpath: &str) -> std::io::Result<()> {
        let interface = Interface::open_file(fullpath)?;
        self.interfaces.push_back((fullpath.to_string(), interface));
        Ok(())
    }

    /// Returns the next line, without line terminator.
    /// Invalid UTF-8 content is replaced, not rejected.
    /// Read errors terminate the current [Interface].
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let (name, interface) = self.interfaces.front_mut()?;

            self.buf.clear();

            match interface.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    debug!("{} - consumed all content", name);
                    self.interfaces.pop_front();
                },
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    return Some(line.trim_end_matches(['\r', '\n']).to_string());
                },
                Err(e) => {
                    error!("{} - i/o error: {}", name, e);
                    self.interfaces.pop_front();
                },
            }
        }
    }
}

impl Iterator for Device {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
