use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new exdeploy project
    Init {
        /// optional - The path to create the project in, default will be where the command is run.
        #[clap(long, short)]
        path: Option<String>,
    },
    /// Deploy the Exchange contract to a configured network
    Deploy {
        #[clap(long, short)]
        path: Option<String>,

        /// Name of the network in exdeploy.yaml
        #[clap(long, short)]
        network: String,
    },
    /// Verify an already-deployed Exchange on the network's block explorer
    Verify {
        #[clap(long, short)]
        path: Option<String>,

        /// Name of the network in exdeploy.yaml
        #[clap(long, short)]
        network: String,

        /// Address of the deployed Exchange
        #[clap(long, short)]
        address: String,
    },
    /// Show the deployer account address and balance for a network
    Account {
        #[clap(long, short)]
        path: Option<String>,

        /// Name of the network in exdeploy.yaml
        #[clap(long, short)]
        network: String,
    },
    /// List the configured networks
    Networks {
        #[clap(long, short)]
        path: Option<String>,
    },
}
