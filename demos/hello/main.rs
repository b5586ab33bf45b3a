//! # clapini demo application
//!
//! A small "hello" CLI whose defaults come from `hello.ini` or `hello.cfg`
//! in the current directory (or `config/profile/`). Values given on the
//! command line still win.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example hello
//! cargo run --example hello -- --name Bob
//! RUST_LOG=clapini=debug cargo run --example hello -- foo
//! ```
//!
//! A config file to try it with:
//!
//! ```ini
//! [hello]
//! name = Alice
//! number = 3
//!
//! [hello.more.foo]
//! numbers = 1 2 3
//! ```

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use clapini::{
    ConfigFileReader, Param, SearchPath, SectionSchema, StorageNaming, apply_default_map,
    apply_schema_help,
};

/// Greets someone, with defaults from hello.ini.
#[derive(Parser, Debug)]
#[command(name = "hello")]
struct Cli {
    /// Who to greet.
    #[arg(long, default_value = "World")]
    name: String,

    #[arg(long, default_value_t = 1)]
    number: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the numbers of [hello.more.foo].
    Foo {
        #[arg(long, num_args = 1..)]
        numbers: Vec<i64>,
    },
}

fn build_reader() -> Result<ConfigFileReader, clapini::ConfigFileError> {
    let hello = SectionSchema::builder("Hello")
        .matches_section("hello")
        .param("name", Param::string().help("Who to greet."))
        .param("number", Param::integer().default(1).help("How many times."))
        .build()?;
    let more = SectionSchema::builder("HelloMore")
        .matches_section("hello.more.*")
        .param("numbers", Param::integer().multiple())
        .build()?;

    ConfigFileReader::builder()
        .config_files(["hello.ini", "hello.cfg"])
        .add_search_path(SearchPath::Path("config/profile".into()))
        .schema(hello)
        .schema(more)
        .storage_naming(StorageNaming::StripPrefix("hello.more.".into()))
        .build()
}

fn main() {
    env_logger::init();

    let (reader, defaults) = match build_reader().and_then(|r| r.read_config().map(|d| (r, d))) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let cmd = apply_default_map(Cli::command(), &defaults);
    let matches = apply_schema_help(cmd, reader.registry().schemas()).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    for _ in 0..cli.number {
        println!("Hello {}!", cli.name);
    }
    if let Some(Commands::Foo { numbers }) = cli.command {
        println!("numbers: {numbers:?}");
    }
}
