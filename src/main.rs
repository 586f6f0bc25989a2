use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use configuration::Config;
use core_types::{
    ElementViewCount, EquipmentUsage, LowActivityStudent, NewUser, Role, StudentActivity,
    StudentExperiment, StudentRef, TeacherStatistics, UserActivity,
};
use credentials::PasswordHasher;
use database::DbRepository;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The main entry point for the SIMLAB virtual chemistry lab.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve { addr } => handle_serve(config, addr).await,
        Commands::Migrate => handle_migrate(&config).await,
        Commands::CreateUser(args) => handle_create_user(&config, args).await,
        Commands::Report(args) => handle_report(&config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A role-based virtual chemistry lab: web server and admin tools.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files are fine.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Listen address; defaults to `server.host:server.port`.
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Apply the embedded database migrations and exit.
    Migrate,
    /// Register an account without going through the web form.
    CreateUser(CreateUserArgs),
    /// Print one of the teacher reports.
    Report(ReportArgs),
}

#[derive(Parser)]
struct CreateUserArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    surname: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// `teacher` or `student`.
    #[arg(long)]
    role: Role,
    /// Required for students.
    #[arg(long)]
    teacher_id: Option<i32>,
}

#[derive(Parser)]
struct ReportArgs {
    kind: ReportKind,
    /// Teacher whose students the report covers. Optional for lab-wide reports.
    #[arg(long)]
    teacher_id: Option<i32>,
    /// Emit JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReportKind {
    EquipmentUsage,
    StudentActivity,
    InactiveStudents,
    LowActivity,
    TeacherStatistics,
    ElementViews,
    StudentExperiments,
    UserActivity,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn repository(config: &Config) -> anyhow::Result<DbRepository> {
    let pool = database::connect(&config.database).await?;
    if config.database.run_migrations {
        database::run_migrations(&pool).await?;
    }
    Ok(DbRepository::new(pool).with_stored_procedure(config.reactions.prefer_stored_procedure))
}

async fn handle_serve(config: Config, addr: Option<SocketAddr>) -> anyhow::Result<()> {
    let addr = match addr {
        Some(addr) => addr,
        None => format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("server.host and server.port do not form a socket address")?,
    };
    web_server::run_server(config, addr).await
}

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = database::connect(&config.database).await?;
    database::run_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}

async fn handle_create_user(config: &Config, args: CreateUserArgs) -> anyhow::Result<()> {
    let repo = repository(config).await?;
    let hasher = PasswordHasher::new(config.auth.pbkdf2_iterations);

    let user = NewUser {
        name: args.name,
        surname: args.surname,
        email: args.email,
        password_hash: hasher.hash(&args.password),
        role: args.role,
        teacher_id: args.teacher_id,
    };
    let user_id = repo.register_user(&user).await?;
    println!("Created {} account {} ({}).", user.role, user_id, user.email);
    Ok(())
}

async fn handle_report(config: &Config, args: ReportArgs) -> anyhow::Result<()> {
    let repo = repository(config).await?;
    let teacher = || match args.teacher_id {
        Some(id) => Ok(id),
        None => bail!("--teacher-id is required for the {:?} report", args.kind),
    };

    match args.kind {
        ReportKind::EquipmentUsage => print_rows(&repo.equipment_usage(args.teacher_id).await?, args.json),
        ReportKind::StudentActivity => print_rows(&repo.student_activity(teacher()?).await?, args.json),
        ReportKind::InactiveStudents => {
            print_rows(&repo.students_without_experiments(teacher()?).await?, args.json)
        }
        ReportKind::LowActivity => {
            let threshold = config.reports.low_activity_threshold;
            print_rows(
                &repo.students_with_few_experiments(teacher()?, threshold).await?,
                args.json,
            )
        }
        ReportKind::TeacherStatistics => print_rows(&repo.teacher_statistics(args.teacher_id).await?, args.json),
        ReportKind::ElementViews => print_rows(&repo.element_views(teacher()?).await?, args.json),
        ReportKind::StudentExperiments => {
            print_rows(&repo.student_experiments(teacher()?).await?, args.json)
        }
        ReportKind::UserActivity => {
            print_rows(&repo.user_activity_summary(args.teacher_id).await?, args.json)
        }
    }
}

// ==============================================================================
// Report Rendering
// ==============================================================================

/// A report row that can be printed as a table line.
trait TableRow: Serialize {
    const HEADER: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn print_rows<R: TableRow>(rows: &[R], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    println!("{}", render_table(rows));
    Ok(())
}

fn render_table<R: TableRow>(rows: &[R]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(R::HEADER.to_vec());
    for row in rows {
        table.add_row(row.cells());
    }
    table
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl TableRow for EquipmentUsage {
    const HEADER: &'static [&'static str] = &["ID", "Equipment", "Used in"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.equipment_id.to_string(),
            self.equipment_name.clone(),
            self.usage_count.to_string(),
        ]
    }
}

impl TableRow for StudentActivity {
    const HEADER: &'static [&'static str] = &["ID", "Student", "Elements viewed", "Equipment viewed"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.full_name.clone(),
            self.total_elements_viewed.to_string(),
            self.total_lab_equipment_viewed.to_string(),
        ]
    }
}

impl TableRow for StudentRef {
    const HEADER: &'static [&'static str] = &["ID", "Student"];
    fn cells(&self) -> Vec<String> {
        vec![self.student_id.to_string(), self.full_name.clone()]
    }
}

impl TableRow for LowActivityStudent {
    const HEADER: &'static [&'static str] = &["ID", "Student", "Experiments"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.full_name.clone(),
            self.total_experiments.to_string(),
        ]
    }
}

impl TableRow for TeacherStatistics {
    const HEADER: &'static [&'static str] = &["ID", "Teacher", "Students", "Experiments", "Avg/student"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.teacher_id.to_string(),
            self.full_name.clone(),
            self.total_students.to_string(),
            self.total_experiments.to_string(),
            or_dash(self.avg_experiments_per_student),
        ]
    }
}

impl TableRow for ElementViewCount {
    const HEADER: &'static [&'static str] = &["ID", "Symbol", "Element", "Viewed by"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.element_id.to_string(),
            self.symbol.clone(),
            self.element_name.clone(),
            self.view_count.to_string(),
        ]
    }
}

impl TableRow for StudentExperiment {
    const HEADER: &'static [&'static str] = &["Student", "Experiment", "Reaction", "Product", "When"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.student_name.clone(),
            self.experiment_id.to_string(),
            format!("{} + {}", self.element1_symbol, self.element2_symbol),
            or_dash(self.product.as_deref()),
            self.participated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl TableRow for UserActivity {
    const HEADER: &'static [&'static str] = &["ID", "User", "Role", "Elements", "Equipment", "Experiments"];
    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.full_name.clone(),
            self.role.clone(),
            self.elements_viewed.to_string(),
            self.equipment_viewed.to_string(),
            self.experiments_participated.to_string(),
        ]
    }
}
