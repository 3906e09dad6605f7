//! Objects used to read and write instances, batch descriptors, reports and summaries.

mod batch_reader;
pub use batch_reader::BatchDescriptorReader;
pub use batch_reader::BatchRow;
pub use batch_reader::BatchRowResult;
pub use batch_reader::MalformedBatchRow;

mod instance_reader;
pub use instance_reader::InstanceReader;

mod report_reader;
pub use report_reader::ReportEntry;
pub use report_reader::ReportReader;

mod report_writer;
pub use report_writer::ReportWriter;

mod summary_writer;
pub use summary_writer::SummaryOutcome;
pub use summary_writer::SummaryWriter;
pub use summary_writer::ERROR_SENTINEL;
pub use summary_writer::TIMEOUT_SENTINEL;
