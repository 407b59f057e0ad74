use constpool::assembly::{self, Assembly};
use constpool::driver;
use constpool::error::SourceMetadata;
use constpool::lexer::Lexer;
use constpool::ConstantPool;
use structopt::StructOpt;

use tracing_subscriber::fmt;

fn main() {
    if let Err(ref e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), anyhow::Error> {
    use anyhow::Context;
    use std::fs;
    use std::io::Write;

    let opt = Opt::from_args();

    if let Ok(filter) = std::env::var("CONSTPOOL_TRACE") {
        fmt::Subscriber::builder()
            .with_ansi(true)
            .pretty()
            .with_env_filter(filter)
            .init();
    }

    let filename = opt.file;
    let file = fs::read_to_string(&filename)
        .with_context(|| format!("could not read {}", filename.display()))?;
    let out_file = driver::output_path(&filename, opt.output)?;
    let meta = SourceMetadata::new(&file).with_file(filename.clone());
    let literals = Lexer::new(&meta).literals()?;

    log::debug!("lexed {} literals from {}", literals.len(), filename.display());

    let mut pool = ConstantPool::new();
    if opt.labels {
        driver::pool_literals(&literals, &mut pool, &mut std::io::stdout().lock())?;
    } else {
        driver::pool_literals(&literals, &mut pool, &mut std::io::sink())?;
    }

    log::debug!("pool holds {} labels", pool.allocated());

    let mut output = assembly::data_section(&pool);
    output.cons(Assembly::Comment(format!("constants of {}", filename.display())));

    let mut file = fs::File::create(&out_file)
        .with_context(|| format!("could not create {}", out_file.display()))?;
    write!(file, "{}", output)?;

    Ok(())
}

#[derive(Debug, StructOpt)]
struct Opt {
    /// The literal file to pool
    #[structopt(parse(from_os_str))]
    file: std::path::PathBuf,
    /// The (optional) output file, defaults to the input with an `.s` extension
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<std::path::PathBuf>,
    /// Print the label each literal was assigned
    #[structopt(short = "l", long = "labels")]
    labels: bool,
}
