//! Raw JSON request command

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use navdeck_engine::commands::engine_command::handle_json_request;

use super::{GlobalArgs, Session};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Request body; read from --file or stdin when omitted
    #[arg(long, conflicts_with = "file")]
    pub request: Option<String>,

    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub pretty: bool,
}

/// Print the response envelope; exit non-zero when it reports an error
pub fn execute(global: &GlobalArgs, args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let body = match (args.request, args.file) {
        (Some(body), _) => body,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };

    let mut session = Session::open(global)?;
    let response = handle_json_request(&body, &mut session.conn, &session.ctx);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", rendered);

    if response["ok"] == serde_json::Value::Bool(true) {
        Ok(())
    } else {
        let code = response["error"]["code"].as_str().unwrap_or("ERR_INTERNAL");
        Err(format!("request failed with {}", code).into())
    }
}
