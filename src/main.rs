//! CLI entrypoint.

use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use quire::render::{FocusMove, LinkTarget};
use quire::{FsStore, Quire, RefKind, RenderFormat, Surfaces};

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Page formats accepted by `--format`.
enum OutputFormat {
	/// Plain text.
	Ascii,
	/// Standalone HTML page.
	Html,
	/// Text styled for the terminal.
	Term,
}

impl From<OutputFormat> for RenderFormat {
	fn from(format: OutputFormat) -> Self {
		match format {
			OutputFormat::Ascii => Self::Ascii,
			OutputFormat::Html => Self::Html,
			OutputFormat::Term => Self::Term,
		}
	}
}

#[derive(Args, Clone)]
struct CommonArgs {
	/// Ingest directory to read documents from (defaults to $QUIRE_INGEST_DIR or ~/.quire/ingest)
	#[arg(short = 'd', long, global = true)]
	ingest_dir: Option<PathBuf>,

	/// Disable ANSI colors in CLI output
	#[arg(long, global = true, default_value_t = false)]
	no_color: bool,

	/// Number of back-references above which they are grouped by module
	#[arg(long, global = true, default_value_t = quire::nav::DEFAULT_THRESHOLD)]
	backref_threshold: usize,
}

#[derive(Args, Clone)]
struct RenderArgs {
	/// Qualified name to render, e.g. `numpy.linspace`
	qa: String,

	/// Version to render; the newest ingested version when omitted
	#[arg(short = 'v', long)]
	version: Option<String>,

	/// Select the output format
	#[arg(short = 'f', long, value_enum, default_value = "term")]
	format: OutputFormat,
}

#[derive(Args, Clone)]
struct BuildArgs {
	/// Render plain text pages
	#[arg(long, default_value_t = false)]
	ascii: bool,

	/// Render HTML pages (the default when no surface is selected)
	#[arg(long, default_value_t = false)]
	html: bool,

	/// Output directory
	#[arg(short = 'o', long, default_value = "html")]
	out: PathBuf,

	/// Render everything but write nothing
	#[arg(long, default_value_t = false)]
	dry_run: bool,
}

#[derive(Subcommand, Clone)]
enum Command {
	/// Render one document.
	Render(RenderArgs),
	/// Print the rewritten document tree as JSON.
	Raw {
		/// Qualified name to dump
		qa: String,
		/// Version to dump
		#[arg(short = 'v', long)]
		version: Option<String>,
	},
	/// Print the breadcrumb levels of a name.
	Nav {
		/// Qualified name to locate
		qa: String,
	},
	/// Render the whole corpus to a directory.
	Build(BuildArgs),
	/// Browse documents interactively, following links from page to page.
	Browse {
		/// Qualified name to start from
		qa: String,
	},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Parsed command-line options for the quire CLI.
struct Cli {
	#[command(subcommand)]
	command: Command,

	#[command(flatten)]
	common: CommonArgs,
}

fn should_color_output(common: &CommonArgs) -> bool {
	if common.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	if std::env::var("TERM").ok().as_deref() == Some("dumb") {
		return false;
	}
	io::stdout().is_terminal()
}

fn open_quire(common: &CommonArgs) -> Result<Quire, Box<dyn Error>> {
	let quire = match &common.ingest_dir {
		Some(dir) => Quire::new(FsStore::new(dir)),
		None => Quire::from_env()?,
	};
	Ok(quire.with_backref_threshold(common.backref_threshold))
}

fn run_render(quire: &Quire, args: &RenderArgs) -> Result<(), Box<dyn Error>> {
	let format = RenderFormat::from(args.format);
	match quire.render_page(&args.qa, args.version.as_deref(), format) {
		Ok(page) => {
			print!("{page}");
			Ok(())
		}
		Err(err) if err.is_not_found() => {
			print!("{}", quire.render_not_found(&args.qa, format)?);
			Err(err.into())
		}
		Err(err) => Err(err.into()),
	}
}

fn run_raw(quire: &Quire, qa: &str, version: Option<&str>) -> Result<(), Box<dyn Error>> {
	let prepared = quire.prepare(qa, version)?;
	println!("{}", serde_json::to_string_pretty(&prepared.doc)?);
	Ok(())
}

fn run_nav(quire: &Quire, qa: &str, color: bool) -> Result<(), Box<dyn Error>> {
	let snapshot = quire.snapshot()?;
	let nav = quire::siblings(qa, snapshot.namespace_tree(), snapshot.ref_map());
	if nav.is_empty() {
		return Err(format!("{qa} is not part of the corpus").into());
	}
	for level in &nav.levels {
		let entries: Vec<String> = level
			.entries
			.iter()
			.map(|entry| {
				if entry.reference.kind == RefKind::Unknown && color {
					entry.label.red().to_string()
				} else {
					entry.label.clone()
				}
			})
			.collect();
		let segment = if color {
			level.segment.bold().to_string()
		} else {
			level.segment.clone()
		};
		println!("{segment} ({}): {}", level.link, entries.join(", "));
	}
	Ok(())
}

fn run_build(quire: Quire, args: &BuildArgs) -> Result<(), Box<dyn Error>> {
	let quire = quire.with_link_extension(".html");

	let mut surfaces = Surfaces::empty();
	if args.ascii {
		surfaces |= Surfaces::ASCII;
	}
	if args.html {
		surfaces |= Surfaces::HTML;
	}
	if surfaces.is_empty() {
		surfaces = Surfaces::default();
	}

	let report = quire.render_all(surfaces)?;
	for failure in &report.failures {
		eprintln!("{}: {}", failure.reference.path, failure.error);
	}

	if args.dry_run {
		println!("rendered {} pages (dry run, nothing written)", report.pages.len());
	} else {
		let written = report.write_to(&args.out)?;
		let assets = quire.copy_assets(&args.out)?;
		println!(
			"wrote {written} pages and {assets} assets to {}",
			args.out.display()
		);
	}

	if report.is_success() {
		Ok(())
	} else {
		Err(format!("{} documents failed to render", report.failures.len()).into())
	}
}

const BROWSE_HELP: &str = "n: next link, p: previous link, <number>: focus link, o: open, q: quit";

fn run_browse(quire: &Quire, qa: &str, color: bool) -> Result<(), Box<dyn Error>> {
	let mut session = quire.browse(qa, None)?;
	let stdin = io::stdin();
	let mut stdout = io::stdout();

	print!("{}", session.paint(color));
	loop {
		print!("[{}] {BROWSE_HELP}\n> ", session.qa());
		stdout.flush()?;

		let mut line = String::new();
		if stdin.lock().read_line(&mut line)? == 0 {
			return Ok(());
		}
		match line.trim() {
			"q" => return Ok(()),
			"n" => {
				if session.focus_next() == FocusMove::AtEnd {
					eprintln!("already on the last link");
				}
			}
			"p" => {
				if session.focus_prev() == FocusMove::AtStart {
					eprintln!("already on the first link");
				}
			}
			"o" => {
				let target = match session.activate().cloned() {
					Some(LinkTarget::Reference(target)) => target,
					Some(LinkTarget::Figure(name)) => {
						match quire.figure_path(session.qa(), &name)? {
							Some(path) => println!("figure {name}: {}", path.display()),
							None => eprintln!("figure {name} is not in the corpus"),
						}
						continue;
					}
					None => {
						eprintln!("no link to follow");
						continue;
					}
				};
				let version = target
					.version
					.as_deref()
					.filter(|version| *version != quire::corpus::ANY_VERSION);
				session = match target.kind {
					RefKind::Api => quire.browse(&target.path, version)?,
					_ => quire.browse(&target.path, None)?,
				};
			}
			other => match other.parse::<usize>() {
				Ok(index) => {
					session.set_focus(index);
				}
				Err(_) => {
					eprintln!("unknown command `{other}`");
					continue;
				}
			},
		}
		print!("{}", session.paint(color));
	}
}

fn main() {
	env_logger::init();
	let cli = Cli::parse();

	let result = run(cli);

	if let Err(e) = result {
		eprintln!("{e}");
		process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
	let common = &cli.common;
	let color = should_color_output(common);

	let quire = open_quire(common)?;

	match &cli.command {
		Command::Build(args) => run_build(quire, args),
		Command::Render(args) => run_render(&quire.with_color(color), args),
		Command::Raw { qa, version } => run_raw(&quire, qa, version.as_deref()),
		Command::Nav { qa } => run_nav(&quire, qa, color),
		Command::Browse { qa } => run_browse(&quire.with_color(color), qa, color),
	}
}
