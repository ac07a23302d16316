use std::env;
use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use log::debug;

use easylmd_ical::cli::{self, Args};
use easylmd_ical::convert::convert_slot;
use easylmd_ical::ics::{build_calendar, write_ics, CALNAME};
use easylmd_ical::parser::parse_schedule;
use easylmd_ical::pdf;
use easylmd_ical::structs::{CourseSlot, SchedulePeriod};

const DAYS_FR: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

const SHORT_NAME_MAX: usize = 25;

fn main() {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging(args.verbose);

    if !args.pdf_path.exists() {
        eprintln!("❌ Fichier introuvable : {}", args.pdf_path.display());
        process::exit(1);
    }

    if let Err(err) = run(&args) {
        if args.verbose {
            eprintln!("❌ {err:?}");
        } else {
            eprintln!("❌ {err:#}");
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let pages = pdf::read_pages(&args.pdf_path).context("Erreur lors de la lecture du PDF")?;

    let (courses, period) = parse_schedule(&pages);
    if courses.is_empty() {
        bail!("Aucun cours trouvé dans le PDF.");
    }

    for course in &courses {
        debug!("extracted {course:?}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
        return Ok(());
    }

    let ics_path = args.output_dir.join(ics_filename(period));

    if !args.dry_run {
        let events: Vec<_> = courses.iter().map(convert_slot).collect();
        let calendar = build_calendar(&events, args.revision);
        write_ics(&calendar, &ics_path)?;
    }

    print_summary(&courses, period, &args.pdf_path, &ics_path, args);
    Ok(())
}

fn setup_logging(verbose: bool) {
    if env::var("LOG").is_err() {
        let level = if verbose {
            "easylmd_ical=debug"
        } else {
            "easylmd_ical=info"
        };
        env::set_var("LOG", level);
    }

    pretty_env_logger::init_custom_env("LOG");
}

fn ics_filename(period: Option<SchedulePeriod>) -> String {
    match period {
        Some(period) => format!("esgcvak_{}_{}.ics", period.start, period.end),
        None => "esgcvak_planning.ics".to_string(),
    }
}

fn print_summary(
    courses: &[CourseSlot],
    period: Option<SchedulePeriod>,
    pdf_path: &Path,
    ics_path: &Path,
    args: &Args,
) {
    println!("\n📄 Lecture de {}...", pdf_path.display());

    match period {
        Some(period) => println!(
            "📅 {} cours trouvés pour la période du {} au {}",
            courses.len(),
            period.start.format("%d/%m/%Y"),
            period.end.format("%d/%m/%Y"),
        ),
        None => println!("📅 {} cours trouvés", courses.len()),
    }

    println!();
    for course in courses {
        println!(
            "  {} {}  {}-{}  {}",
            day_abbr(course.date),
            course.date.format("%d/%m"),
            course.start_time.format("%H:%M"),
            course.end_time.format("%H:%M"),
            summary_short(course),
        );
    }

    if args.dry_run {
        println!("\n🔍 Mode dry-run : aucun fichier généré.");
    } else {
        println!("\n✅ Fichier généré : {}", ics_path.display());
        println!("   Rappels : 2 jours, 1 jour, 30 min avant chaque cours");
        println!("   Calendrier cible : {CALNAME}");
        println!("   Révision : {}", args.revision);
    }
}

fn day_abbr(date: NaiveDate) -> &'static str {
    DAYS_FR[date.weekday().num_days_from_monday() as usize]
}

/// Console rendition of a slot, with the course name truncated to keep one
/// slot per line.
fn summary_short(course: &CourseSlot) -> String {
    let mut name = course.course_name.clone();
    if name.chars().count() > SHORT_NAME_MAX {
        name = name.chars().take(SHORT_NAME_MAX - 1).collect();
        name = format!("{}.", name.trim_end());
    }

    if course.course_type.is_empty() {
        format!("[{}] {name}", course.class_group)
    } else {
        format!("[{}] {name} ({})", course.class_group, course.course_type)
    }
}
