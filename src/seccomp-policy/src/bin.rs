// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufReader, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info};
use seccomp_policy::logger::{LOGGER, LoggerUpdateError};
use seccomp_policy::{
    ConfigError, FilterError, InterpreterError, Policy, PolicyConfig,
    PolicyError, SeccompData, SerializationError, TargetArch, builtin_policy, compile,
    deserialize_binary, host_policy, install_with, serialize_program,
};

const DEFAULT_OUTPUT_FILENAME: &str = "seccomp_policy.bpf";

/// Exit codes of the binary.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyExitCode {
    /// Success.
    Ok = 0,
    /// Generic error.
    GenericError = 1,
    /// The policy could not be built from the configuration and base tables.
    BadConfiguration = 152,
    /// The policy could not be compiled or installed. Running unfiltered is not an option.
    PolicyFailure = 153,
    /// The command could not be executed after the filter was installed.
    ExecFailure = 154,
}

impl From<PolicyExitCode> for ExitCode {
    fn from(code: PolicyExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, thiserror::Error, displaydoc::Display)]
enum MainError {
    /// Failed to set up the logger: {0}
    Logger(#[from] LoggerUpdateError),
    /// {0}
    Config(#[from] ConfigError),
    /// Cannot open base filter file {0}: {1}
    BaseFiltersOpen(String, std::io::Error),
    /// {0}
    Policy(#[from] PolicyError),
    /// {0}
    Filter(#[from] FilterError),
    /// Cannot serialize the compiled filter: {0}
    Serialize(SerializationError),
    /// Cannot write output file {0}: {1}
    OutputWrite(String, std::io::Error),
    /// Cannot evaluate the filter: {0}
    Interpreter(#[from] InterpreterError),
    /// Syscall number {0} is out of range.
    SyscallNumber(u32),
    /// Command to execute is missing.
    MissingCommand,
    /// Cannot execute {0}: {1}
    Exec(String, std::io::Error),
}

impl MainError {
    fn exit_code(&self) -> PolicyExitCode {
        match self {
            MainError::Logger(_) | MainError::OutputWrite(..) | MainError::Serialize(_) => {
                PolicyExitCode::GenericError
            }
            MainError::Config(_)
            | MainError::BaseFiltersOpen(..)
            | MainError::SyscallNumber(_)
            | MainError::MissingCommand
            | MainError::Policy(PolicyError::MissingBaseTable(_))
            | MainError::Policy(PolicyError::UnsupportedHost(_))
            | MainError::Policy(PolicyError::Deserialization(_)) => {
                PolicyExitCode::BadConfiguration
            }
            MainError::Policy(_) | MainError::Filter(_) | MainError::Interpreter(_) => {
                PolicyExitCode::PolicyFailure
            }
            MainError::Exec(..) => PolicyExitCode::ExecFailure,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version = format!("v{}", env!("CARGO_PKG_VERSION")))]
struct Cli {
    #[arg(short, long, global = true, help = "JSON file with policy overrides.")]
    config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        help = "Bincode file with generated base tables, replacing the built-in ones."
    )]
    base_filters: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        help = "Native architecture whose built-in policy is used. Defaults to the host. \
                Supported architectures: x86_64, aarch64."
    )]
    target_arch: Option<TargetArch>,
    #[arg(long, global = true, help = "Log level: off, error, warn, info, debug or trace.")]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
enum PolicyCommand {
    /// Compiles the policy and writes the serialized program.
    Compile {
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILENAME)]
        output: PathBuf,
    },
    /// Prints the compiled program, one instruction per line.
    Dump,
    /// Evaluates the compiled program for one syscall.
    Check {
        #[arg(short, long)]
        arch: TargetArch,
        #[arg(short, long)]
        nr: u32,
    },
    /// Installs the policy and executes a command under it.
    Exec {
        #[arg(long, help = "Set no_new_privs before installing, needed without CAP_SYS_ADMIN.")]
        no_new_privs: bool,
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

fn main() -> ExitCode {
    if let Err(err) = LOGGER.init() {
        eprintln!("Failed to register logger: {err}");
        return PolicyExitCode::GenericError.into();
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => PolicyExitCode::Ok.into(),
        Err(err) => {
            error!("{err}");
            err.exit_code().into()
        }
    }
}

fn run(cli: Cli) -> Result<(), MainError> {
    let config = cli
        .config
        .as_deref()
        .map(PolicyConfig::from_file)
        .transpose()?
        .unwrap_or_default();

    let mut logger_config = config.logger.clone().unwrap_or_default();
    if cli.log_level.is_some() {
        logger_config.level = cli.log_level;
    }
    LOGGER.update(logger_config)?;

    let policy = load_policy(cli.target_arch, cli.base_filters.as_deref(), &config)?;

    match cli.command {
        PolicyCommand::Compile { output } => compile_to_file(&policy, &output),
        PolicyCommand::Dump => dump(&policy),
        PolicyCommand::Check { arch, nr } => check(&policy, arch, nr),
        PolicyCommand::Exec {
            no_new_privs,
            command,
        } => exec(&policy, no_new_privs, &command),
    }
}

fn load_policy(
    target_arch: Option<TargetArch>,
    base_filters: Option<&Path>,
    config: &PolicyConfig,
) -> Result<Policy, MainError> {
    let mut policy = match target_arch {
        Some(arch) => builtin_policy(arch)?,
        None => host_policy()?,
    };

    if let Some(path) = base_filters {
        let file = File::open(path)
            .map_err(|err| MainError::BaseFiltersOpen(path.display().to_string(), err))?;
        let tables = deserialize_binary(BufReader::new(file)).map_err(PolicyError::from)?;
        policy = policy.with_base_tables(&tables)?;
    }

    Ok(config.apply(policy))
}

fn compile_to_file(policy: &Policy, output: &Path) -> Result<(), MainError> {
    let program = compile(policy)?;
    let bytes = serialize_program(&program).map_err(MainError::Serialize)?;
    std::fs::write(output, bytes)
        .map_err(|err| MainError::OutputWrite(output.display().to_string(), err))?;
    info!(
        "Wrote filter of {} instructions to {}",
        program.len(),
        output.display()
    );
    Ok(())
}

fn dump(policy: &Policy) -> Result<(), MainError> {
    let program = compile(policy)?;
    let mut out = std::io::stdout().lock();
    for (index, insn) in program.iter().enumerate() {
        // A closed stdout is not worth an error.
        let _ = writeln!(
            out,
            "{index:4}: code={:#06x} jt={:3} jf={:3} k={:#010x}",
            insn.code, insn.jt, insn.jf, insn.k
        );
    }
    Ok(())
}

fn check(policy: &Policy, arch: TargetArch, nr: u32) -> Result<(), MainError> {
    let program = compile(policy)?;
    let signed_nr = i32::try_from(nr).map_err(|_| MainError::SyscallNumber(nr))?;
    let verdict = seccomp_policy::interpreter::run(
        &program,
        &SeccompData::new(arch.audit_value(), signed_nr),
    )?;

    let listed = [&policy.native, &policy.compat]
        .into_iter()
        .any(|arch_policy| arch_policy.arch == arch && arch_policy.lists(nr));
    println!(
        "{arch} {nr}: {} ({} instructions{})",
        verdict.action,
        verdict.steps,
        if listed { ", explicitly listed" } else { "" }
    );
    Ok(())
}

fn exec(policy: &Policy, no_new_privs: bool, command: &[String]) -> Result<(), MainError> {
    let (program_name, args) = command.split_first().ok_or(MainError::MissingCommand)?;
    install_with(policy, no_new_privs)?;

    // Only returns on failure.
    let err = Command::new(program_name).args(args).exec();
    Err(MainError::Exec(program_name.clone(), err))
}
