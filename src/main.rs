//! Binary entry point for the `create-datavolume-from-manifest` task.

use std::error::Error as _;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::{debug, error};

use create_datavolume::{
    ClientInitError, CliOptions, ConfigError, CreateError, CreateRequest, CreatorConfig,
    DataVolumeCreator, ExitCode, KubeDataVolumeClient, OptionsError, OutputError, ResultsError,
    ResultsWriter, ServiceAccountNamespace, Severity, logging,
};

mod cli;

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    ClientInit(#[from] ClientInitError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Results(#[from] ResultsError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CliError {
    const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Options(_) | Self::Create(CreateError::Namespace(_)) => {
                ExitCode::INVALID_CLI_INPUT
            }
            Self::Config(_) | Self::ClientInit(_) => ExitCode::CREATOR_INIT,
            Self::Create(_) => ExitCode::CREATE_DATA_VOLUME,
            Self::Results(_) | Self::Output(_) => ExitCode::WRITE_RESULTS,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            Self::Options(_) => Severity::Soft,
            Self::Create(err) => err.severity(),
            Self::Config(_) | Self::ClientInit(_) | Self::Results(_) | Self::Output(_) => {
                Severity::Fatal
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let options = options_from(Cli::parse()).trimmed();
    logging::init(options.log_level());

    let exit_code = match run(&options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    process::exit(exit_code.code());
}

fn options_from(cli: Cli) -> CliOptions {
    CliOptions {
        dv_manifest: cli.dv_manifest.unwrap_or_default(),
        dv_namespace: cli.dv_namespace.unwrap_or_default(),
        wait_for_success: cli.wait_for_success.unwrap_or_default(),
        output: cli.output.unwrap_or_default(),
        debug: cli.debug,
    }
}

fn request_from(options: &CliOptions) -> CreateRequest {
    let request =
        CreateRequest::new(options.manifest()).wait_for_success(options.wait_for_success());
    match options.namespace() {
        Some(namespace) => request.namespace(namespace),
        None => request,
    }
}

async fn run(options: &CliOptions) -> Result<(), CliError> {
    options.validate()?;
    let output = options.output_type().map_err(OptionsError::from)?;
    debug!(
        namespace = options.namespace().unwrap_or_default(),
        wait_for_success = options.wait_for_success(),
        output = options.output.as_str(),
        "parsed arguments"
    );

    let config = CreatorConfig::load_without_cli_args()?;
    config.validate()?;
    let client = KubeDataVolumeClient::infer().await?;
    let creator =
        DataVolumeCreator::new(client, ServiceAccountNamespace::new(config.namespace_file()))
            .with_poll_interval(config.poll_interval())
            .with_wait_timeout(config.wait_timeout());

    let data_volume = creator.create(&request_from(options)).await?;

    debug!(
        name = data_volume.name(),
        namespace = data_volume.namespace(),
        "recording results"
    );
    ResultsWriter::new(config.results_dir()).record(&data_volume)?;

    output.print(&data_volume, &mut io::stdout().lock())?;
    Ok(())
}

fn report_error(err: &CliError) {
    if err.severity().is_fatal() {
        error!(error = %err, chain = %source_chain(err), "create-datavolume-from-manifest failed");
    }
    write_error(io::stderr(), err);
}

fn source_chain(err: &CliError) -> String {
    let mut chain = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        chain.push(source.to_string());
        current = source.source();
    }
    chain.join(": ")
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
