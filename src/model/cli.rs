use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// The generated script launches the workload.
    ByPipa,
    /// The workload is started separately; the script samples for a fixed time.
    ByUser,
}
