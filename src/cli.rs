use clap::Parser;

/// Profiles and regions come from the Alibaba Cloud CLI configuration, so
/// there is nothing to pass on the command line.
#[derive(Parser, Debug)]
#[command(name = "lazyaliyun", version, about = "TUI for browsing Alibaba Cloud resources")]
pub struct Args {}
