//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::protocol::DEFAULT_PORT;
use crate::server::AnswerPolicy;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Live classroom quiz server", long_about = None)]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// How answers to questions other than the current one are treated
    #[arg(long, env = "ANSWER_POLICY", value_enum, default_value_t = AnswerPolicy::Sequential)]
    pub answer_policy: AnswerPolicy,

    /// JSON quiz files to make available at startup
    #[arg(short = 'q', long = "quiz", value_name = "FILE")]
    pub quiz_files: Vec<PathBuf>,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            answer_policy: AnswerPolicy::default(),
            quiz_files: Vec::new(),
        }
    }
}
