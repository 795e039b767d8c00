use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "quickzip")]
#[command(version)]
#[command(about = "Extract ZIP archives, including password-protected ones, with progress reporting", long_about = None)]
#[command(after_help = "Examples:\n  \
  quickzip data.zip -d out           extract data.zip into out/\n  \
  quickzip secret.zip -P hunter2     extract a password-protected archive\n  \
  quickzip secret.zip -P hunter2 -t  check the password without extracting\n  \
  quickzip -l data.zip               list archive contents")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Password for encrypted archives
    #[arg(short = 'P', long = "password", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Test the password against the archive without extracting
    #[arg(short = 't', long = "test-password", requires = "password")]
    pub test_password: bool,

    /// Quiet mode (suppress the progress line)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }
}
