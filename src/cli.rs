use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "crowd-server-rs",
    version,
    about = "Wi-Fi probe telemetry server with crowd statistics"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 1323)]
    pub port: u16,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
}
