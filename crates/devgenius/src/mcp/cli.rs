#[derive(Debug, clap::Parser)]
#[command(name = "mcp")]
#[command(about = "Model Context Protocol server")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Serve the assistant tools over stdio
    #[clap(name = "stdio")]
    Stdio,
}
