use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Social fitness workout tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout (default)
    Log {
        /// Workout name
        #[arg(long)]
        name: Option<String>,

        /// Category to pick exercises from (chest, back, legs, shoulders,
        /// arms, core, cardio, full_body)
        #[arg(long)]
        category: Option<String>,

        /// Scripted exercise entry, e.g. "Bench Press=60x10,60x10" with an
        /// optional "w:" prefix per warmup set (repeatable)
        #[arg(long = "entry")]
        entries: Vec<String>,

        /// Skip rest countdowns
        #[arg(long)]
        no_rest: bool,
    },

    /// Show one saved workout in detail
    Show {
        /// Workout id
        id: String,
    },

    /// List recent workouts
    History {
        /// How many days back to look
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Show the workout streak
    Streak,

    /// List personal records
    Records,

    /// Export workout history to CSV
    Export {
        /// Output file
        output: PathBuf,

        /// How many days back to export
        #[arg(long, default_value_t = 365)]
        days: i64,
    },
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = build_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Exercise catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let mut store = LocalStore::open(
        data_dir,
        config.profile.to_profile(),
        config.custom_exercises(),
    )?;

    match cli.command {
        Some(Commands::Log {
            name,
            category,
            entries,
            no_rest,
        }) => cmd_log(&mut store, &config, name, category, entries, no_rest),
        Some(Commands::Show { id }) => cmd_show(&store, &id),
        Some(Commands::History { days }) => cmd_history(&store, days),
        Some(Commands::Streak) => cmd_streak(&store),
        Some(Commands::Records) => cmd_records(&store),
        Some(Commands::Export { output, days }) => cmd_export(&store, &output, days),
        None => cmd_log(&mut store, &config, None, None, vec![], false),
    }
}

// ----------------------------------------------------------------------------
// Logging flow
// ----------------------------------------------------------------------------

fn cmd_log(
    store: &mut LocalStore,
    config: &Config,
    name: Option<String>,
    category: Option<String>,
    entries: Vec<String>,
    no_rest: bool,
) -> Result<()> {
    let mut session = LogSession::open(store, config.profile.to_profile(), Box::new(UuidGen));

    if entries.is_empty() {
        log_interactive(store, &mut session, name, category, no_rest)
    } else {
        log_scripted(store, &mut session, name, category, entries)
    }
}

/// Non-interactive logging driven entirely by --category/--entry flags
fn log_scripted(
    store: &mut LocalStore,
    session: &mut LogSession,
    name: Option<String>,
    category: Option<String>,
    entries: Vec<String>,
) -> Result<()> {
    let category = category
        .as_deref()
        .and_then(ExerciseCategory::parse)
        .ok_or_else(|| Error::Workout("--entry requires a valid --category".into()))?;

    session.start_workout(name.as_deref().unwrap_or(""), chrono::Utc::now())?;

    for entry in &entries {
        let (exercise_name, set_specs) = entry
            .split_once('=')
            .ok_or_else(|| Error::Workout(format!("Invalid entry '{}', expected NAME=SETS", entry)))?;

        // Each entry re-queries the picker, same as switching screens
        session.select_category(store, category)?;
        let exercise = session
            .find_exercise(exercise_name.trim())
            .ok_or_else(|| {
                Error::Workout(format!(
                    "No exercise named '{}' in {}",
                    exercise_name.trim(),
                    category.label()
                ))
            })?
            .clone();
        let exercise_index = session.add_exercise(exercise)?;

        for (set_index, spec) in set_specs.split(',').enumerate() {
            if set_index > 0 {
                session.add_set(exercise_index)?;
            }
            let (weight, reps, warmup) = parse_set_spec(spec)?;
            session.update_set(exercise_index, set_index, SetField::Weight(Some(weight)))?;
            session.update_set(exercise_index, set_index, SetField::Reps(Some(reps)))?;
            session.update_set(exercise_index, set_index, SetField::Warmup(warmup))?;
            session.complete_set(exercise_index, set_index)?;
            session.skip_rest();
        }
    }

    finish_and_report(store, session)
}

/// Prompt-driven logging flow
fn log_interactive(
    store: &mut LocalStore,
    session: &mut LogSession,
    name: Option<String>,
    category: Option<String>,
    no_rest: bool,
) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => prompt("Workout name (optional): ")?,
    };
    session.start_workout(&name, chrono::Utc::now())?;

    let mut preselected = category;
    loop {
        // Category screen
        let category = match preselected.take().and_then(|c| ExerciseCategory::parse(&c)) {
            Some(category) => category,
            None => prompt_category()?,
        };

        // Exercise screen
        let exercises = session.select_category(store, category)?;
        println!("\n{} exercises:", category.label());
        for (i, exercise) in exercises.iter().enumerate() {
            let equipment = exercise.equipment.as_deref().unwrap_or("bodyweight");
            println!("  {}. {} ({})", i + 1, exercise.name, equipment);
        }

        let pick = prompt("Pick an exercise (number): ")?;
        let Some(exercise) = pick
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| session.exercises().get(i))
            .cloned()
        else {
            println!("Not a valid choice.");
            continue;
        };

        let exercise_index = session.add_exercise(exercise)?;
        enter_sets(session, exercise_index, no_rest)?;

        match prompt("[a]dd another exercise, [r]emove last, or [f]inish: ")?
            .to_lowercase()
            .as_str()
        {
            "a" => continue,
            "r" => {
                session.remove_exercise(exercise_index)?;
                println!("Removed.");
                continue;
            }
            _ => break,
        }
    }

    finish_and_report(store, session)
}

/// Read sets for one exercise until a blank line
///
/// The exercise arrives seeded with its first set; each completed set is
/// followed by an add_set so the next prompt shows the carried values. The
/// trailing uncompleted set is silently dropped on save.
fn enter_sets(session: &mut LogSession, exercise_index: usize, no_rest: bool) -> Result<()> {
    let mut set_index = 0;
    loop {
        let carried = session
            .draft()
            .and_then(|d| d.exercises.get(exercise_index))
            .and_then(|e| e.sets.get(set_index))
            .map(|s| (s.weight, s.reps));
        if let Some((Some(weight), Some(reps))) = carried {
            println!("  Set {}: carrying {} x {}", set_index + 1, weight, reps);
        }

        let line = prompt(&format!(
            "  Set {} - WEIGHT REPS (prefix 'w' for warmup, blank to stop): ",
            set_index + 1
        ))?;
        if line.is_empty() {
            break;
        }

        let Ok((weight, reps, warmup)) = parse_set_line(&line) else {
            println!("  Could not parse that, try e.g. '60 10' or 'w 40 8'.");
            continue;
        };

        session.update_set(exercise_index, set_index, SetField::Weight(Some(weight)))?;
        session.update_set(exercise_index, set_index, SetField::Reps(Some(reps)))?;
        session.update_set(exercise_index, set_index, SetField::Warmup(warmup))?;
        session.complete_set(exercise_index, set_index)?;

        if no_rest {
            session.skip_rest();
        } else {
            run_rest_countdown(session);
        }

        session.add_set(exercise_index)?;
        set_index += 1;
    }
    Ok(())
}

/// Block printing the countdown until the rest timer clears
fn run_rest_countdown(session: &mut LogSession) {
    if !session.rest_timer().is_running() {
        return;
    }
    while let Some(remaining) = session.rest_timer().remaining() {
        print!("\r  Rest: {:>3}s ", remaining);
        let _ = io::stdout().flush();
        std::thread::sleep(std::time::Duration::from_secs(1));
        session.tick_rest();
    }
    println!("\r  Rest done.        ");
}

fn finish_and_report(store: &mut LocalStore, session: &mut LogSession) -> Result<()> {
    let unit = session.profile().preferred_unit;
    let outcome = session.finish(store, chrono::Utc::now())?;

    println!("\n✓ Workout saved!");
    println!(
        "  Streak: {} day{} (best {})",
        outcome.streak.current_streak,
        if outcome.streak.current_streak == 1 { "" } else { "s" },
        outcome.streak.longest_streak
    );
    for update in &outcome.record_updates {
        if update.record.kind == RecordKind::MaxWeight {
            println!(
                "  New PR: {} at {} {}",
                update.exercise_name,
                update.record.value,
                unit.label()
            );
        }
    }

    // Post-save navigation: straight to the detail view
    println!();
    print_detail(store, outcome.workout.id)?;
    Ok(())
}

// ----------------------------------------------------------------------------
// Read-only views
// ----------------------------------------------------------------------------

fn cmd_show(store: &LocalStore, id: &str) -> Result<()> {
    let id = uuid::Uuid::parse_str(id)
        .map_err(|e| Error::Workout(format!("Invalid workout id: {}", e)))?;
    print_detail(store, id)
}

fn print_detail(store: &LocalStore, id: uuid::Uuid) -> Result<()> {
    let Some(detail) = load_detail(store, id)? else {
        println!("No workout with id {}", id);
        return Ok(());
    };
    let unit = store.load_profile()?.preferred_unit;

    println!(
        "{} ({})",
        detail.workout.name,
        detail.workout.started_at.format("%Y-%m-%d %H:%M")
    );
    println!("  id: {}", detail.workout.id);
    for exercise in &detail.exercises {
        println!("  {}", exercise.exercise_name);
        for set in &exercise.sets {
            let warmup = if set.is_warmup { " (warmup)" } else { "" };
            match (set.weight, set.reps) {
                (Some(weight), Some(reps)) => println!(
                    "    {}. {} {} x {}{}",
                    set.set_number,
                    weight,
                    unit.label(),
                    reps,
                    warmup
                ),
                _ => println!("    {}. (incomplete){}", set.set_number, warmup),
            }
        }
    }
    Ok(())
}

fn cmd_history(store: &LocalStore, days: i64) -> Result<()> {
    let now = chrono::Utc::now();
    let details = load_recent(store, days, now)?;

    if details.is_empty() {
        println!("No workouts in the last {} days.", days);
        return Ok(());
    }

    println!("Last {} days:", days);
    for detail in &details {
        println!(
            "  {}  {}  ({} exercises, volume {:.0})  {}",
            detail.workout.started_at.format("%Y-%m-%d"),
            detail.workout.name,
            detail.exercises.len(),
            detail.volume(),
            detail.workout.id
        );
    }

    let volume = weekly_volume(store, now)?;
    println!("\nThis week's volume: {:.0}", volume);
    Ok(())
}

fn cmd_streak(store: &LocalStore) -> Result<()> {
    let streak = store.load_streak()?;
    println!("Current streak: {} days", streak.current_streak);
    println!("Longest streak: {} days", streak.longest_streak);
    match streak.last_workout_date {
        Some(date) => println!("Last workout:   {}", date),
        None => println!("Last workout:   never"),
    }
    Ok(())
}

fn cmd_records(store: &LocalStore) -> Result<()> {
    let records = store.load_records()?;
    if records.is_empty() {
        println!("No personal records yet.");
        return Ok(());
    }
    let unit = store.load_profile()?.preferred_unit;

    println!("Personal records:");
    for record in &records {
        let name = store
            .get_exercise(&record.exercise_id)?
            .map(|e| e.name)
            .unwrap_or_else(|| record.exercise_id.clone());
        match record.kind {
            RecordKind::MaxWeight => println!(
                "  {}: {} {} ({})",
                name,
                record.value,
                unit.label(),
                record.achieved_at.format("%Y-%m-%d")
            ),
            RecordKind::MaxReps => println!(
                "  {}: {} reps ({})",
                name,
                record.value,
                record.achieved_at.format("%Y-%m-%d")
            ),
        }
    }
    Ok(())
}

fn cmd_export(store: &LocalStore, output: &std::path::Path, days: i64) -> Result<()> {
    let count = export_history(store, output, days, chrono::Utc::now())?;
    println!("✓ Exported {} set rows", count);
    println!("  CSV: {}", output.display());
    Ok(())
}

// ----------------------------------------------------------------------------
// Input parsing
// ----------------------------------------------------------------------------

/// Parse a scripted set spec: "60x10" or "w:40x8"
fn parse_set_spec(spec: &str) -> Result<(f64, u32, bool)> {
    let spec = spec.trim();
    let (spec, warmup) = match spec.strip_prefix("w:") {
        Some(rest) => (rest, true),
        None => (spec, false),
    };

    let (weight, reps) = spec.split_once('x').ok_or_else(|| {
        Error::Workout(format!("Invalid set '{}', expected WEIGHTxREPS", spec))
    })?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| Error::Workout(format!("Invalid weight in '{}'", spec)))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .map_err(|_| Error::Workout(format!("Invalid reps in '{}'", spec)))?;
    Ok((weight, reps, warmup))
}

/// Parse an interactive set line: "60 10" or "w 40 8"
fn parse_set_line(line: &str) -> Result<(f64, u32, bool)> {
    let mut tokens = line.split_whitespace().peekable();
    let warmup = tokens.peek().map(|t| t.eq_ignore_ascii_case("w")) == Some(true);
    if warmup {
        tokens.next();
    }

    let weight: f64 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::Workout(format!("Invalid set line '{}'", line)))?;
    let reps: u32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::Workout(format!("Invalid set line '{}'", line)))?;
    Ok((weight, reps, warmup))
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input)?;
    if read == 0 {
        return Err(Error::Workout("Input stream closed".into()));
    }
    Ok(input.trim().to_string())
}

fn prompt_category() -> Result<ExerciseCategory> {
    loop {
        println!("\nCategories:");
        for (i, category) in ExerciseCategory::SELECTABLE.iter().enumerate() {
            println!("  {}. {}", i + 1, category.label());
        }
        let pick = prompt("What are you training today? ")?;

        if let Some(category) = pick
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ExerciseCategory::SELECTABLE.get(i).copied())
            .or_else(|| ExerciseCategory::parse(&pick))
        {
            return Ok(category);
        }
        println!("Not a valid category.");
    }
}
