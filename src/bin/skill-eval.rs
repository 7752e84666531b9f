use clap::{Parser, Subcommand};
use secrecy::SecretString;
use skill_eval::{
    Error, InternalResult,
    config::{self, EvalConfig, ResourcesConfig},
    corpus,
    debug::{
        AttachMode, DEFAULT_DEBUG_PORT, HOSTED_CODE_FOLDER, InvocationInfo, LaunchRequest, Runtime,
    },
    error::ConfigurationError,
    evaluation,
    model::InteractionModel,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory containing ask-resources.json
    #[arg(short = 'C', long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Resources profile
    #[arg(short, long, env = "ASK_DEFAULT_PROFILE", global = true)]
    profile: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the NLU evaluation corpus for a locale
    Eval(EvalArgs),

    /// Run the skill code locally in a debug session
    Debug(DebugArgs),
}

#[derive(Parser)]
struct EvalArgs {
    /// Path to eval config file (JSON)
    #[arg(short, long, default_value = "eval.json")]
    config: PathBuf,

    /// Locale of the interaction model, e.g. en-US
    #[arg(short, long)]
    locale: Option<String>,

    /// Skill package directory, overrides ask-resources.json
    #[arg(short, long)]
    skill_package: Option<PathBuf>,

    /// Directory the corpus files are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when an intent expands to more cases than this
    #[arg(long)]
    max_cases: Option<usize>,
}

#[derive(Parser)]
struct DebugArgs {
    /// Skill id to debug
    #[arg(long, env = "ASK_SKILL_ID")]
    skill_id: String,

    /// Access token for the debug stream
    #[arg(long, env = "ASK_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Code region in ask-resources.json
    #[arg(long, default_value = "default")]
    region: String,

    /// Runtime, e.g. nodejs18.x; read from ask-resources.json when omitted
    #[arg(long)]
    runtime: Option<String>,

    /// Handler, e.g. index.handler; read from ask-resources.json when omitted
    #[arg(long)]
    handler: Option<String>,

    /// Skill code folder; read from ask-resources.json when omitted
    #[arg(long)]
    code_folder: Option<PathBuf>,

    /// Treat the skill as hosted (fixed entry points, code in ./lambda)
    #[arg(long)]
    hosted: bool,

    /// Start suspended and wait for a debugger to attach
    #[arg(short, long)]
    wait_for_attach: bool,

    /// Port the debugger attaches to
    #[arg(long, default_value_t = DEFAULT_DEBUG_PORT)]
    debug_port: u16,
}

fn load_eval_config(cli: &Cli, args: &EvalArgs) -> InternalResult<EvalConfig> {
    let config_path = cli.project_dir.join(&args.config);
    let mut config: EvalConfig = if config_path.exists() {
        config::from_file(&config_path)?
    } else {
        EvalConfig::default()
    };
    if let Some(locale) = &args.locale {
        config.locale = locale.clone();
    }
    if let Some(profile) = &cli.profile {
        config.profile = profile.clone();
    }
    if let Some(skill_package) = &args.skill_package {
        config.skill_package = Some(skill_package.clone());
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
    if args.max_cases.is_some() {
        config.max_cases_per_intent = args.max_cases;
    }
    Ok(config)
}

fn resolve_skill_package(project_dir: &Path, config: &EvalConfig) -> InternalResult<PathBuf> {
    let relative = match &config.skill_package {
        Some(dir) => dir.clone(),
        None => ResourcesConfig::load(project_dir)?.skill_metadata_src(&config.profile)?,
    };
    Ok(project_dir.join(relative))
}

fn run_eval(cli: &Cli, args: &EvalArgs) -> InternalResult<()> {
    let config = load_eval_config(cli, args)?;
    debug!("config: {:?}", config);

    let skill_package = resolve_skill_package(&cli.project_dir, &config)?;
    let model_path = config.model_path(&skill_package);
    info!("Loading interaction model {}", model_path.display());

    let model = InteractionModel::from_file(&model_path)?;
    let suite = evaluation::build_all_with(&model, &config)?;
    let written = corpus::write_suite(&cli.project_dir.join(&config.output_dir), &suite)?;

    for (path, (intent, cases)) in written.iter().zip(suite.iter()) {
        println!("{}: {} cases -> {}", intent, cases.len(), path.display());
    }
    println!(
        "Generated {} evaluation cases for {} intents.",
        suite.total_cases(),
        suite.len()
    );
    Ok(())
}

fn build_launch_request(cli: &Cli, args: &DebugArgs) -> InternalResult<LaunchRequest> {
    let profile = cli.profile.clone().unwrap_or_else(|| "default".to_string());
    let needs_resources = args.runtime.is_none()
        || (!args.hosted && (args.handler.is_none() || args.code_folder.is_none()));
    let resources = if needs_resources {
        Some(ResourcesConfig::load(&cli.project_dir)?)
    } else {
        None
    };
    let hosted = args.hosted || resources.as_ref().is_some_and(|r| r.is_hosted(&profile));
    let user_config = resources.as_ref().and_then(|r| r.user_config(&profile));

    let runtime_name = args
        .runtime
        .clone()
        .or_else(|| user_config.and_then(|u| u.runtime.clone()))
        .ok_or_else(|| {
            ConfigurationError::InvalidResources("Missing runtime info in userConfig".to_string())
        })?;
    let runtime: Runtime = runtime_name.parse()?;

    let handler = args
        .handler
        .clone()
        .or_else(|| user_config.and_then(|u| u.handler.clone()));
    let invocation = InvocationInfo::resolve(handler.as_deref(), runtime, hosted)?;

    let code_folder = match (&args.code_folder, &resources) {
        (Some(folder), _) => folder.clone(),
        (None, _) if hosted => PathBuf::from(HOSTED_CODE_FOLDER),
        (None, Some(resources)) => resources.code_src(&profile, &args.region)?,
        (None, None) => return Err(Error::internal("code folder could not be resolved")),
    };

    Ok(LaunchRequest {
        runtime,
        invocation,
        code_folder: cli.project_dir.join(code_folder),
        attach: AttachMode::new(args.wait_for_attach, args.debug_port),
        token: SecretString::new(Box::from(args.access_token.as_str())),
        skill_id: args.skill_id.clone(),
    })
}

fn run_debug(cli: &Cli, args: &DebugArgs) -> InternalResult<()> {
    let request = build_launch_request(cli, args)?;
    debug!("launch request: {:?}", request);

    let mut session = skill_eval::debug::start(request)?;
    println!(
        "{} debug session started (pid {}).",
        session.runtime(),
        session.id()
    );
    let status = session.wait()?;
    println!("Debug session exited with {}.", status);
    Ok(())
}

fn run(cli: &Cli) -> InternalResult<()> {
    match &cli.command {
        Commands::Eval(args) => run_eval(cli, args),
        Commands::Debug(args) => run_debug(cli, args),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
