use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the artifact publisher.
///
/// The binary is a thin composition root: it wires credentials, builds
/// one S3 publisher and pushes the given files through it.
#[derive(Parser, Debug)]
#[clap(name = "artifact-publisher", about = "Publish build artifacts to object storage")]
pub struct Args {
    /// Artifact files to publish
    #[clap(required = true)]
    pub files: Vec<PathBuf>,

    /// Destination bucket name
    #[clap(short, long)]
    pub bucket: String,

    /// Object ACL (default: public-read)
    #[clap(long)]
    pub acl: Option<String>,

    /// Storage class, passed through to the provider unvalidated
    #[clap(long)]
    pub storage_class: Option<String>,

    /// Bucket region (default: SDK default region)
    #[clap(long)]
    pub region: Option<String>,

    /// Override the destination key; only valid with a single file
    #[clap(short, long)]
    pub name: Option<String>,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,
}
