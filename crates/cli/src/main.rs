//! Cockpit descriptor tool.
//!
//! Loads the builtin descriptors plus an optional descriptor directory and
//! answers questions about them as JSON on stdout:
//! - `validate` reports which descriptors loaded and which were rejected
//! - `resolve` prints the visible tabs and actions for a context
//! - `bind` prints the bound parameters and dispatch plan of one action

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use cockpit_registry::{BindMode, CallSite};

mod commands;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "cockpit")]
#[command(about = "Validate and resolve console resource descriptors")]
struct Args {
	/// Directory of additional `*.json` descriptors
	#[arg(short, long, value_name = "DIR", global = true)]
	descriptors: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Load every descriptor and report rejections
	Validate,
	/// Print the visible tabs and actions of a resource
	Resolve {
		/// Resource descriptor name
		#[arg(short, long)]
		resource: String,
		/// JSON file holding the context (`record`, `route`, `user`)
		#[arg(short, long, value_name = "FILE")]
		context: PathBuf,
		/// Call site; derived from the context when omitted
		#[arg(long, value_enum)]
		site: Option<SiteArg>,
		/// Bind parameters of every visible action
		#[arg(long)]
		eager: bool,
	},
	/// Print the bound parameters and dispatch plan of one action
	Bind {
		#[arg(short, long)]
		resource: String,
		/// Action api name
		#[arg(short, long)]
		action: String,
		#[arg(short, long, value_name = "FILE")]
		context: PathBuf,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SiteArg {
	List,
	Record,
}

impl From<SiteArg> for CallSite {
	fn from(site: SiteArg) -> Self {
		match site {
			SiteArg::List => CallSite::List,
			SiteArg::Record => CallSite::Record,
		}
	}
}

fn main() -> ExitCode {
	let args = Args::parse();
	setup_tracing(args.verbose);

	match run(args) {
		Ok(code) => code,
		Err(error) => {
			tracing::error!("{error:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
	let dir = args.descriptors.as_deref();
	let (output, clean) = match args.command {
		Command::Validate => {
			let validation = commands::validate(dir)?;
			let clean = validation.clean;
			(validation.output, clean)
		}
		Command::Resolve {
			resource,
			context,
			site,
			eager,
		} => {
			let store = commands::load_store(dir)?;
			let ctx = commands::read_context(&context)?;
			let binding = if eager { BindMode::Eager } else { BindMode::Deferred };
			(commands::resolve(&store, &resource, &ctx, site.map(CallSite::from), binding)?, true)
		}
		Command::Bind {
			resource,
			action,
			context,
		} => {
			let store = commands::load_store(dir)?;
			let ctx = commands::read_context(&context)?;
			(commands::bind(&store, &resource, &action, &ctx)?, true)
		}
	};

	println!("{}", serde_json::to_string_pretty(&output)?);
	Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("COCKPIT_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("info")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
