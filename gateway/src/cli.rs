use clap::Parser;

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "N-in-row Inference Gateway")]
#[clap(about = "Serves move search for n-in-row boards over HTTP", long_about = None)]
pub struct Cli {
    /// HOCON config file. Missing files fall back to defaults and environment variables.
    #[clap(short, long, default_value_t = String::from("gateway.conf"))]
    pub config: String,
}
