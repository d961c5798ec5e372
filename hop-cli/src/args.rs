use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "Hop CLI")]
#[command(bin_name = "hop-cli")]
pub struct Cli {
    #[arg(short, long, global = true, help = "enable debug logs")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub mode: ModeSelect,
}

#[derive(Subcommand, Debug)]
pub enum ModeSelect {
    #[command(about = "run the motion analysis pipeline over a recorded session csv")]
    Analyze(AnalyzeCli),

    #[command(about = "print the default pipeline configuration as toml")]
    DefaultConfig,
}

#[derive(Parser, Debug)]
pub struct AnalyzeCli {
    #[arg(help = "session csv with timestamp and ax1..oz1, ax2..oz2, ... columns")]
    pub input: std::path::PathBuf,

    #[arg(long, help = "pipeline configuration toml")]
    pub config: Option<std::path::PathBuf>,

    #[arg(short, long, help = "write the full json report here")]
    pub output: Option<std::path::PathBuf>,

    #[arg(long, default_value_t = 0.001, help = "seconds per timestamp tick")]
    pub time_scale: f64,

    #[arg(long, value_delimiter = ',', help = "channel names in column order")]
    pub channel_names: Vec<String>,
}
