use clap::{
    Parser,
    Subcommand,
};
use wfcore::{
    ac::{
        Principal,
        Role,
    },
    activity::Fields,
};
use wfctrl::platform::{
    Builder,
    Platform,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    builder: Builder,
    /// Name of the principal acting on requests and tasks.
    #[clap(long = "as", value_name = "WF_PRINCIPAL", env = "WF_PRINCIPAL")]
    principal: Option<String>,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    Principal {
        #[command(subcommand)]
        cmd: PrincipalCmd,
    },
    #[command(arg_required_else_help = true)]
    Workflow {
        #[command(subcommand)]
        cmd: WorkflowCmd,
    },
    #[command(arg_required_else_help = true)]
    Request {
        #[command(subcommand)]
        cmd: RequestCmd,
    },
    #[command(arg_required_else_help = true)]
    Task {
        #[command(subcommand)]
        cmd: TaskCmd,
    },
}

#[derive(Debug, Subcommand)]
enum PrincipalCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        #[clap(long, action)]
        elevated: bool,
    },
    #[command(arg_required_else_help = true)]
    Grant {
        name: String,
        role: String,
    },
    #[command(arg_required_else_help = true)]
    Revoke {
        name: String,
        role: String,
    },
    #[command(arg_required_else_help = true)]
    Show {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum WorkflowCmd {
    List,
}

#[derive(Debug, Subcommand)]
enum RequestCmd {
    #[command(arg_required_else_help = true)]
    List {
        module: String,
    },
    #[command(arg_required_else_help = true)]
    Show {
        id: i64,
    },
    /// Start a request with the fields of the initial activity as JSON.
    #[command(arg_required_else_help = true)]
    Initiate {
        module: String,
        fields: String,
    },
    #[command(arg_required_else_help = true)]
    Withdraw {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum TaskCmd {
    #[command(arg_required_else_help = true)]
    Show {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Engage {
        id: i64,
        fields: String,
    },
    #[command(arg_required_else_help = true)]
    Save {
        id: i64,
        fields: String,
    },
    #[command(arg_required_else_help = true)]
    Submit {
        id: i64,
        next: Option<String>,
    },
    #[command(arg_required_else_help = true)]
    Finish {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Rollback {
        id: i64,
    },
}

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("wfctrl")
        .module("wfdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let platform = args.builder
        .build(wfsample::registry()?)
        .await
        .map_err(anyhow::Error::from_boxed)?;
    let principal = args.principal;

    match args.command {
        Commands::Principal { cmd } => {
            parse_principal(&platform, cmd).await?;
        },
        Commands::Workflow { cmd } => {
            parse_workflow(&platform, cmd).await?;
        },
        Commands::Request { cmd } => {
            parse_request(&platform, acting(&platform, principal).await?, cmd).await?;
        },
        Commands::Task { cmd } => {
            parse_task(&platform, acting(&platform, principal).await?, cmd).await?;
        },
    }

    Ok(())
}

async fn acting(
    platform: &Platform,
    name: Option<String>,
) -> anyhow::Result<Principal> {
    let name = name.ok_or_else(|| anyhow::anyhow!(
        "the acting principal must be provided with --as or WF_PRINCIPAL"
    ))?;
    Ok(platform.principal(&name).await?)
}

fn fields(input: &str) -> anyhow::Result<Fields> {
    Ok(serde_json::from_str(input)?)
}

async fn parse_principal(
    platform: &Platform,
    arg: PrincipalCmd,
) -> anyhow::Result<()> {
    let backend = platform.backend();
    match arg {
        PrincipalCmd::Create { name, elevated } => {
            let id = backend.add_principal(&name, elevated).await?;
            println!("created principal id {id} named {name}");
        }
        PrincipalCmd::Grant { name, role } => {
            let principal = platform.principal(&name).await?;
            match backend.grant_role_to_principal(principal.id, &role.parse::<Role>()?).await? {
                true => println!("granted role {role} to {name}"),
                false => println!("{name} already has role {role}"),
            }
        }
        PrincipalCmd::Revoke { name, role } => {
            let principal = platform.principal(&name).await?;
            match backend.revoke_role_from_principal(principal.id, &role.parse::<Role>()?).await? {
                true => println!("revoked role {role} from {name}"),
                false => println!("{name} does not have role {role}"),
            }
        }
        PrincipalCmd::Show { name } => {
            let principal = platform.principal(&name).await?;
            println!("{}", serde_json::to_string_pretty(&principal)?);
        }
    }
    Ok(())
}

async fn parse_workflow(
    platform: &Platform,
    arg: WorkflowCmd,
) -> anyhow::Result<()> {
    match arg {
        WorkflowCmd::List => {
            for module in platform.modules() {
                let flow = platform.registry().flow(module)?;
                println!("{module} (initial: {})", flow.initial());
                for def in flow.activities() {
                    println!(
                        "  {} [{}] {} role={} -> {:?}",
                        def.key(),
                        def.title(),
                        def.name(),
                        def.role(),
                        def.transitions(),
                    );
                }
            }
        }
    }
    Ok(())
}

async fn parse_request(
    platform: &Platform,
    principal: Principal,
    arg: RequestCmd,
) -> anyhow::Result<()> {
    match arg {
        RequestCmd::List { module } => {
            for request in platform.list_requests(&module).await? {
                println!(
                    "{}\t{}\trequester={}\tupdated={}",
                    request.id,
                    request.status,
                    request.requester_id,
                    request.updated_ts,
                );
            }
        }
        RequestCmd::Show { id } => {
            let request = platform.request_history(id, &principal).await?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        RequestCmd::Initiate { module, fields: input } => {
            let initiated = platform.initiate_request(&module, &principal, &fields(&input)?).await?;
            println!(
                "initiated request {} with task {} ({})",
                initiated.request.id,
                initiated.task.id,
                initiated.record.code(&module),
            );
        }
        RequestCmd::Withdraw { id } => {
            let request = platform.withdraw(id, &principal).await?;
            println!("request {} is {}", request.id, request.status);
        }
    }
    Ok(())
}

async fn parse_task(
    platform: &Platform,
    principal: Principal,
    arg: TaskCmd,
) -> anyhow::Result<()> {
    match arg {
        TaskCmd::Show { id } => {
            let view = platform.view_task(id, &principal).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        TaskCmd::Engage { id, fields: input } => {
            let engaged = platform.assign_and_initiate(id, &principal, &fields(&input)?).await?;
            println!("task {} is {}", engaged.task.id, engaged.task.status);
        }
        TaskCmd::Save { id, fields: input } => {
            let engaged = platform.save(id, &principal, &fields(&input)?).await?;
            println!("saved record {} of task {}", engaged.record.id, engaged.task.id);
        }
        TaskCmd::Submit { id, next } => {
            let advanced = platform.submit(id, &principal, next.as_deref()).await?;
            match advanced.successor {
                Some(task) => println!(
                    "task {} completed; task {} ({}) assigned to {}",
                    advanced.task.id,
                    task.id,
                    task.activity,
                    task.assignee,
                ),
                None => println!(
                    "task {} completed; request {} is {}",
                    advanced.task.id,
                    advanced.request.id,
                    advanced.request.status,
                ),
            }
        }
        TaskCmd::Finish { id } => {
            let advanced = platform.finish(id, &principal).await?;
            println!("request {} is {}", advanced.request.id, advanced.request.status);
        }
        TaskCmd::Rollback { id } => {
            let rolled_back = platform.rollback(id, &principal).await?;
            println!(
                "tasks {} and {} rolled back; task {} restores {}",
                rolled_back.previous.id,
                rolled_back.current.id,
                rolled_back.task.id,
                rolled_back.task.activity,
            );
        }
    }
    Ok(())
}
