// crates/logging/src/sink.rs
use std::fs::File;
use tracing_subscriber::fmt::MakeWriter;

pub(crate) struct FileWriter {
    pub(crate) file: File,
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = &'a File;

    fn make_writer(&'a self) -> Self::Writer {
        &self.file
    }
}
