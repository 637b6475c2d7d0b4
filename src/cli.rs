//! Command-line front end over the command surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{self, backup, exercise, generate, report, tree};
use crate::config::AppConfig;
use crate::db::{AppState, SqliteStore};
use crate::intensity::{resolve_day, DayReport};
use crate::models::{
  ExerciseKind, ExercisePatch, IntensityUnit, ProgramInfoPatch, StatsPatch, TrainingProgram,
};
use crate::store::ProgramStore;

#[derive(Parser)]
#[command(name = "training-planner")]
#[command(about = "Strength & conditioning program editor", long_about = None)]
#[command(version)]
pub struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// SQLite file holding saved programs
  #[arg(long, global = true)]
  db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
  /// List all programs
  List,

  /// Create a program and make it active
  New,

  /// Make a program active
  Use {
    /// Program ID
    id: String,
  },

  /// Delete a program
  Delete {
    /// Program ID
    id: String,
  },

  /// Show the active program with resolved targets
  Show,

  /// Show one day with resolved targets
  Day {
    /// Day ID
    day: String,
  },

  /// Weekly strength volume and conditioning distance
  Volume,

  /// Edit athlete name and goal
  Info {
    #[arg(long)]
    athlete: Option<String>,

    #[arg(long)]
    goal: Option<String>,
  },

  /// Append a training cycle
  AddCycle,

  /// Append a week to a cycle
  AddWeek {
    /// Cycle ID
    cycle: String,
  },

  /// Append a day to a week
  AddDay {
    /// Cycle ID
    cycle: String,
    /// Week ID
    week: String,
  },

  /// Append a default exercise to a day
  AddExercise {
    /// Day ID
    day: String,

    /// Add a conditioning exercise instead of a strength one
    #[arg(long)]
    conditioning: bool,
  },

  /// Edit fields of an exercise
  EditExercise(EditExerciseArgs),

  /// Remove an exercise from a day
  RemoveExercise {
    /// Day ID
    day: String,
    /// Exercise ID
    exercise: String,
  },

  /// Flip a wellness marker on a day (sleep, stress, energy, mood)
  Fatigue {
    /// Day ID
    day: String,
    /// Marker key
    marker: String,
  },

  /// Set baseline stats for a cycle
  Stats(StatsArgs),

  /// Generate a microcycle with AI and append it
  Generate {
    #[arg(long)]
    goal: String,

    /// Experience level
    #[arg(long, default_value = "Intermediate")]
    level: String,
  },

  /// Replace all programs with a backup file
  Import {
    file: PathBuf,
  },

  /// Write a dated backup file
  Export {
    /// Target directory (defaults to PLANNER_EXPORT_DIR)
    #[arg(long)]
    dir: Option<PathBuf>,
  },

  /// Show categories, units, exercises, markers and pace zones
  Catalog,

  /// Delete every program
  Reset {
    /// Confirm deletion
    #[arg(long)]
    yes: bool,
  },
}

#[derive(Args)]
struct EditExerciseArgs {
  /// Day ID
  day: String,
  /// Exercise ID
  exercise: String,

  #[arg(long)]
  name: Option<String>,
  #[arg(long)]
  sets: Option<u32>,
  #[arg(long)]
  reps: Option<String>,
  #[arg(long)]
  intensity: Option<String>,
  /// RPE, % 1RM, RIR, % MAS or % MSS
  #[arg(long)]
  unit: Option<IntensityUnit>,
  #[arg(long)]
  rest: Option<String>,
  #[arg(long)]
  notes: Option<String>,
  #[arg(long)]
  category: Option<String>,
  /// Rep distance in meters (conditioning only)
  #[arg(long)]
  distance: Option<f64>,
}

#[derive(Args)]
struct StatsArgs {
  /// Cycle ID
  cycle: String,

  /// Maximal aerobic speed, m/s
  #[arg(long)]
  mas: Option<f64>,
  /// Maximal sprint speed, m/s
  #[arg(long)]
  mss: Option<f64>,
  #[arg(long)]
  squat: Option<f64>,
  #[arg(long)]
  deadlift: Option<f64>,
  #[arg(long)]
  push: Option<f64>,
  #[arg(long)]
  pull: Option<f64>,
  #[arg(long)]
  press: Option<f64>,
}

impl Cli {
  pub async fn execute(self) -> Result<(), String> {
    let mut config = AppConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(db) = self.db {
      config.db_path = db;
    }

    let store = SqliteStore::open(&config.db_path)
      .await
      .map_err(|e| format!("Failed to open database: {}", e))?;
    let state = AppState::load(store, config)
      .await
      .map_err(|e| format!("Failed to load programs: {}", e))?;

    run_command(&state, self.command).await?;
    commands::save_now(&state).await
  }
}

async fn run_command<S: ProgramStore>(state: &AppState<S>, command: Command) -> Result<(), String> {
  match command {
    Command::List => {
      let programs = commands::list_programs(state).await?;
      if programs.is_empty() {
        println!("No programs. Create one with `training-planner new`.");
      }
      for p in programs {
        let marker = if p.active { "*" } else { " " };
        println!(
          "{} {}  {} ({} cycles){}",
          marker,
          p.id,
          p.athlete_name,
          p.cycle_count,
          if p.goal.is_empty() { String::new() } else { format!(" - {}", p.goal) }
        );
      }
    }
    Command::New => {
      let program = commands::create_program(state).await?;
      println!("Created program {}", program.id);
    }
    Command::Use { id } => {
      if !commands::select_program(state, id.clone()).await? {
        return Err(format!("No program {}", id));
      }
      println!("Active program: {}", id);
    }
    Command::Delete { id } => {
      if !commands::delete_program(state, id.clone()).await? {
        return Err(format!("No program {}", id));
      }
      println!("Deleted program {}", id);
    }
    Command::Show => match commands::get_active_program(state).await? {
      Some(program) => print_program(&program),
      None => println!("No active program."),
    },
    Command::Day { day } => match report::day_report(state, day.clone()).await? {
      Some(report) => print_day(&report, ""),
      None => return Err(format!("No day {} in the active program", day)),
    },
    Command::Volume => {
      for week in report::weekly_volume(state).await? {
        println!(
          "{:<8} strength {:>10.1}   conditioning {:>8.0} m",
          week.label, week.strength, week.conditioning
        );
      }
    }
    Command::Info { athlete, goal } => {
      let patch = ProgramInfoPatch {
        athlete_name: athlete,
        goal,
      };
      done(commands::update_program_info(state, patch).await?, "program")?;
    }
    Command::AddCycle => {
      let id = tree::add_cycle(state).await?;
      println!("Added cycle {}", found(id, "active program")?);
    }
    Command::AddWeek { cycle } => {
      let id = tree::add_week(state, cycle.clone()).await?;
      println!("Added week {}", found(id, &format!("cycle {}", cycle))?);
    }
    Command::AddDay { cycle, week } => {
      let id = tree::add_day(state, cycle, week.clone()).await?;
      println!("Added day {}", found(id, &format!("week {}", week))?);
    }
    Command::AddExercise { day, conditioning } => {
      let kind = if conditioning {
        ExerciseKind::Conditioning
      } else {
        ExerciseKind::Strength
      };
      let id = exercise::add_exercise(state, day.clone(), kind).await?;
      println!("Added exercise {}", found(id, &format!("day {}", day))?);
    }
    Command::EditExercise(args) => {
      let patch = ExercisePatch {
        name: args.name,
        sets: args.sets,
        reps: args.reps,
        intensity: args.intensity,
        unit: args.unit,
        rest: args.rest,
        notes: args.notes,
        category: args.category,
        distance: args.distance,
      };
      let result = exercise::update_exercise(state, args.day, args.exercise.clone(), patch).await?;
      done(result, &format!("exercise {}", args.exercise))?;
    }
    Command::RemoveExercise { day, exercise: ex } => {
      let result = exercise::remove_exercise(state, day, ex.clone()).await?;
      done(result, &format!("exercise {}", ex))?;
    }
    Command::Fatigue { day, marker } => {
      let result = tree::toggle_fatigue_check(state, day.clone(), marker).await?;
      done(result, &format!("day {}", day))?;
    }
    Command::Stats(args) => {
      let patch = StatsPatch {
        mas: args.mas,
        mss: args.mss,
        squat_1rm: args.squat,
        deadlift_1rm: args.deadlift,
        push_1rm: args.push,
        pull_1rm: args.pull,
        press_1rm: args.press,
      };
      let result = tree::update_cycle_stats(state, args.cycle.clone(), patch).await?;
      done(result, &format!("cycle {}", args.cycle))?;
    }
    Command::Generate { goal, level } => {
      let program = generate::generate_cycle(state, goal, level).await?;
      if let Some(cycle) = program.cycles.last() {
        println!("Added generated cycle {} ({})", cycle.name, cycle.id);
      }
    }
    Command::Import { file } => {
      let count = backup::import_file(state, &file).await?;
      println!("Imported {} programs", count);
    }
    Command::Export { dir } => {
      let path = backup::export_to_dir(state, dir).await?;
      println!("Exported to {}", path.display());
    }
    Command::Catalog => {
      let catalog = report::catalog();
      let json = serde_json::to_string_pretty(&catalog)
        .map_err(|e| format!("Failed to render catalog: {}", e))?;
      println!("{}", json);
    }
    Command::Reset { yes } => {
      if !yes {
        return Err("Refusing to delete every program without --yes".to_string());
      }
      commands::reset_all(state).await?;
      println!("All programs deleted");
    }
  }
  Ok(())
}

fn found(id: Option<String>, target: &str) -> Result<String, String> {
  id.ok_or_else(|| format!("Not found: {}", target))
}

fn done(result: Option<TrainingProgram>, target: &str) -> Result<(), String> {
  match result {
    Some(_) => {
      println!("Updated {}", target);
      Ok(())
    }
    None => Err(format!("Not found: {}", target)),
  }
}

// ---------------------------------------------------------------------------
/// Rendering
// ---------------------------------------------------------------------------

fn print_program(program: &TrainingProgram) {
  println!("{} [{}]", program.athlete_name, program.id);
  if !program.goal.is_empty() {
    println!("Goal: {}", program.goal);
  }

  for (c_idx, cycle) in program.cycles.iter().enumerate() {
    let s = &cycle.stats;
    println!();
    println!("C{} {} [{}]", c_idx + 1, cycle.name, cycle.id);
    println!(
      "   MAS {:.2} m/s  MSS {:.2} m/s  squat {}  deadlift {}  push {}  pull {}  press {}",
      s.mas,
      s.mss,
      kg(s.squat_1rm),
      kg(s.deadlift_1rm),
      kg(s.push_1rm),
      kg(s.pull_1rm),
      kg(s.press_1rm)
    );

    for week in &cycle.weeks {
      println!("  W{} {} [{}]", week.week_number, week.title, week.id);
      for day in &week.days {
        if let Some(report) = resolve_day(program, &day.id) {
          print_day(&report, "    ");
        }
      }
    }
  }
}

fn print_day(report: &DayReport, indent: &str) {
  println!(
    "{}{} [{}] readiness {}/10",
    indent, report.title, report.location.day_id, report.readiness
  );
  for row in &report.rows {
    let name = if row.name.is_empty() { "(unnamed)" } else { row.name.as_str() };
    let mut line = format!("{}  - {} {} [{}]", indent, name, row.prescription, row.exercise_id);

    if let Some(target) = &row.strength {
      match target.weight_label() {
        Some(weight) => line.push_str(&format!(" -> {} ({})", weight, target.effect.label())),
        None => line.push_str(&format!(" ({})", target.effect.label())),
      }
    }
    if let Some(pace) = &row.pace {
      line.push_str(&format!(" -> {}", pace.speed_label()));
      if let Some(time) = &pace.time_label {
        line.push_str(&format!(", {} per rep", time));
      }
    }
    println!("{}", line);
  }
}

fn kg(value: Option<f64>) -> String {
  match value {
    Some(v) if v > 0.0 => format!("{:.1} kg", v),
    _ => "-".to_string(),
  }
}
