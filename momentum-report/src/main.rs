//! momentum-report - Productivity report CLI
//!
//! Prints a dashboard, weekly, or monthly report for one user from the
//! local momentum database.

use anyhow::{Context, Result};
use chrono::{DateTime, Days, Utc};
use clap::Parser;
use momentum_core::analytics::{
    self, ConsistencyReport, DashboardOverview, HeatmapSummary, Insight, InsightContext,
    InsightEngine, MonthlyStats, TimeWindow, WeeklyStats,
};
use momentum_core::clock::{Clock, SystemClock};
use momentum_core::{
    Config, Database, Goal, GoalPeriod, Mood, Reflection, Skill, SkillCategory, Task,
    TaskPriority, TaskStatus,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "momentum-report")]
#[command(about = "Momentum - your productivity report")]
#[command(version)]
struct Args {
    /// User whose records to report on
    #[arg(long, default_value = "default")]
    user: String,

    /// Days covered by the consistency score and insights
    /// (default: analytics.consistency_days from config)
    #[arg(long)]
    days: Option<i64>,

    /// Report on the current week instead of the dashboard
    #[arg(long)]
    weekly: bool,

    /// Report on the current month instead of the dashboard
    #[arg(long)]
    monthly: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Seed the database with two weeks of demo records first
    #[arg(long)]
    seed_demo: bool,
}

/// Everything the dashboard view renders, in one payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardReport {
    overview: DashboardOverview,
    consistency: ConsistencyReport,
    heatmap: HeatmapSummary,
    insights: Vec<Insight>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = momentum_core::logging::init(&config.logging).ok();

    let db = Database::open(&config.database_path()).context("failed to open database")?;
    db.migrate().context("failed to run migrations")?;

    let clock = SystemClock;

    if args.weekly && args.monthly {
        anyhow::bail!("--weekly and --monthly are mutually exclusive");
    }

    if args.seed_demo {
        seed_demo(&db, &args.user, &clock).context("failed to seed demo data")?;
        eprintln!("Seeded demo records for user '{}'", args.user);
    }

    if args.weekly {
        let stats = build_weekly(&db, &args.user, &clock)?;
        match args.export.as_deref() {
            Some("json") => print_json(&stats)?,
            Some("md") => print_weekly_markdown(&stats),
            Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
            None => print_weekly_terminal(&stats),
        }
        return Ok(());
    }

    if args.monthly {
        let stats = build_monthly(&db, &args.user, &clock)?;
        match args.export.as_deref() {
            Some("json") => print_json(&stats)?,
            Some("md") => print_monthly_markdown(&stats),
            Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
            None => print_monthly_terminal(&stats),
        }
        return Ok(());
    }

    let days = args.days.unwrap_or(config.analytics.consistency_days);
    let report = build_dashboard(&db, &args.user, &clock, days, config.analytics.heatmap_days)?;
    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some("md") => print_dashboard_markdown(&args.user, &report),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_dashboard_terminal(&args.user, &report),
    }

    Ok(())
}

// ============================================
// Report assembly
// ============================================

/// Build the dashboard payload from one task fetch per collection.
///
/// The full task history is fetched once and reused for today's
/// counters, the streak, the consistency window, and the heatmap.
fn build_dashboard(
    db: &Database,
    user: &str,
    clock: &dyn Clock,
    consistency_days: i64,
    heatmap_days: i64,
) -> Result<DashboardReport> {
    let tasks = db.find_tasks(user, None).context("failed to fetch tasks")?;
    let goals = db.find_goals(user).context("failed to fetch goals")?;
    let skills = db.find_skills(user).context("failed to fetch skills")?;
    let reflections = db
        .find_reflections(user)
        .context("failed to fetch reflections")?;

    let overview = analytics::overview(clock, &tasks, &goals, &skills);

    let window = TimeWindow::last_n_days(clock, consistency_days)?;
    let windowed: Vec<Task> = tasks
        .iter()
        .filter(|t| window.contains(t.created_at))
        .cloned()
        .collect();
    let consistency = analytics::consistency_score(&window, &windowed);

    let heatmap_window = TimeWindow::last_n_days(clock, heatmap_days)?;
    let buckets = analytics::group_by_day(&tasks);
    let heatmap = analytics::build_heatmap(&heatmap_window, &buckets);

    let engine = InsightEngine::with_default_rules();
    let insights = engine.run(&InsightContext {
        window: &window,
        tasks: &windowed,
        streak: &overview.streak,
        goals: &goals,
        skills: &skills,
        reflections: &reflections,
    });

    Ok(DashboardReport {
        overview,
        consistency,
        heatmap: heatmap.summary,
        insights,
    })
}

fn build_weekly(db: &Database, user: &str, clock: &dyn Clock) -> Result<WeeklyStats> {
    let window = TimeWindow::current_week(clock);
    let tasks = db.find_tasks(user, Some(&window))?;
    let goals = db.find_goals_overlapping(user, &window)?;
    Ok(analytics::weekly_rollup(&window, &tasks, &goals))
}

fn build_monthly(db: &Database, user: &str, clock: &dyn Clock) -> Result<MonthlyStats> {
    let window = TimeWindow::current_month(clock);
    let tasks = db.find_tasks(user, Some(&window))?;
    let goals = db.find_goals_overlapping(user, &window)?;
    let skills = db.find_skills(user)?;
    let reflections = db.find_reflections_in(user, &window)?;
    Ok(analytics::monthly_rollup(
        &window,
        &tasks,
        &goals,
        &skills,
        &reflections,
    ))
}

// ============================================
// Printers
// ============================================

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn header(title: &str) {
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();
}

fn print_dashboard_terminal(user: &str, report: &DashboardReport) {
    header(&format!("MOMENTUM — {}", user));

    println!("TODAY ({})", report.overview.today.date);
    println!(
        "   Tasks: {}   Completed: {}   Pending: {}   Rate: {}%",
        report.overview.today.tasks.total,
        report.overview.today.tasks.completed,
        report.overview.today.tasks.pending,
        report.overview.today.tasks.completion_rate,
    );
    println!(
        "   Active goals: {}   Active skills: {}",
        report.overview.active.goals, report.overview.active.skills
    );
    println!();

    println!("STREAK");
    let streak = &report.overview.streak;
    println!(
        "   Current:  {} day{}{}",
        streak.current_streak,
        if streak.current_streak == 1 { "" } else { "s" },
        if streak.streak_active { " (active)" } else { "" },
    );
    println!("   Longest:  {} days", streak.longest_streak);
    if let Some(last) = streak.last_activity_date {
        println!("   Last activity: {}", last);
    }
    println!();

    println!("CONSISTENCY ({})", report.consistency.period);
    println!("   Score: {}/100", report.consistency.consistency_score);
    println!(
        "   Active days: {}/{}   Completion days: {}   Task rate: {}%",
        report.consistency.metrics.days_with_activity,
        report.consistency.metrics.total_days,
        report.consistency.metrics.days_with_completed_tasks,
        report.consistency.metrics.task_completion_rate,
    );
    println!();

    println!("HEATMAP ({} days)", report.heatmap.total_days);
    println!(
        "   Active days: {} ({}%)   Completed: {}",
        report.heatmap.active_days, report.heatmap.activity_rate, report.heatmap.total_completed,
    );
    println!(
        "   Best day: {} ({} completed)",
        report.heatmap.best_day.date, report.heatmap.best_day.completed
    );
    println!();

    if !report.insights.is_empty() {
        println!("INSIGHTS");
        for insight in &report.insights {
            println!("   {} {}", insight.icon, insight.title);
            println!("      {}", insight.message);
        }
        println!();
    }
}

fn print_dashboard_markdown(user: &str, report: &DashboardReport) {
    println!("# Momentum report: {}", user);
    println!();

    println!("## Today ({})", report.overview.today.date);
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Tasks | {} |", report.overview.today.tasks.total);
    println!("| Completed | {} |", report.overview.today.tasks.completed);
    println!(
        "| Completion rate | {}% |",
        report.overview.today.tasks.completion_rate
    );
    println!("| Active goals | {} |", report.overview.active.goals);
    println!("| Active skills | {} |", report.overview.active.skills);
    println!();

    println!("## Streak");
    println!();
    println!(
        "- **Current:** {} days{}",
        report.overview.streak.current_streak,
        if report.overview.streak.streak_active {
            " (active)"
        } else {
            ""
        }
    );
    println!("- **Longest:** {} days", report.overview.streak.longest_streak);
    println!();

    println!("## Consistency ({})", report.consistency.period);
    println!();
    println!("- **Score:** {}/100", report.consistency.consistency_score);
    println!(
        "- **Active days:** {} of {}",
        report.consistency.metrics.days_with_activity, report.consistency.metrics.total_days
    );
    println!();

    println!("## Heatmap ({} days)", report.heatmap.total_days);
    println!();
    println!(
        "- **Active days:** {} ({}%)",
        report.heatmap.active_days, report.heatmap.activity_rate
    );
    println!(
        "- **Best day:** {} with {} completed",
        report.heatmap.best_day.date, report.heatmap.best_day.completed
    );
    println!();

    if !report.insights.is_empty() {
        println!("## Insights");
        println!();
        for insight in &report.insights {
            println!("- {} **{}** — {}", insight.icon, insight.title, insight.message);
        }
        println!();
    }

    println!("---");
    println!("*Generated by momentum-report*");
}

fn print_weekly_terminal(stats: &WeeklyStats) {
    header(&format!(
        "WEEK {} — {}",
        stats.week_period.start, stats.week_period.end
    ));

    println!("TASKS");
    println!(
        "   Total: {}   Completed: {}   Pending: {}   In progress: {}",
        stats.tasks.total, stats.tasks.completed, stats.tasks.pending, stats.tasks.in_progress
    );
    println!("   Completion rate: {}%", stats.tasks.completion_rate);
    println!();

    println!("BY DAY");
    let by_day = &stats.tasks.by_day;
    for (name, count) in [
        ("Monday", by_day.monday),
        ("Tuesday", by_day.tuesday),
        ("Wednesday", by_day.wednesday),
        ("Thursday", by_day.thursday),
        ("Friday", by_day.friday),
        ("Saturday", by_day.saturday),
        ("Sunday", by_day.sunday),
    ] {
        println!("   {:<10} {}", name, count);
    }
    println!();

    println!("GOALS");
    println!(
        "   Active: {}   Completed: {}   Total: {}",
        stats.goals.active, stats.goals.completed, stats.goals.total
    );
    println!();
}

fn print_weekly_markdown(stats: &WeeklyStats) {
    println!(
        "# Week {} — {}",
        stats.week_period.start, stats.week_period.end
    );
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Tasks | {} |", stats.tasks.total);
    println!("| Completed | {} |", stats.tasks.completed);
    println!("| Pending | {} |", stats.tasks.pending);
    println!("| In progress | {} |", stats.tasks.in_progress);
    println!("| Completion rate | {}% |", stats.tasks.completion_rate);
    println!("| Goals (active/total) | {}/{} |", stats.goals.active, stats.goals.total);
    println!();
    println!("---");
    println!("*Generated by momentum-report*");
}

fn print_monthly_terminal(stats: &MonthlyStats) {
    header(&format!(
        "{} {}",
        stats.month_period.month.to_uppercase(),
        stats.month_period.year
    ));

    println!("TASKS");
    println!(
        "   Total: {}   Completed: {}   Rate: {}%",
        stats.tasks.total, stats.tasks.completed, stats.tasks.completion_rate
    );
    println!(
        "   Priority: {} high / {} medium / {} low",
        stats.tasks.by_priority.high, stats.tasks.by_priority.medium, stats.tasks.by_priority.low
    );
    println!();

    println!("GOALS");
    println!(
        "   Total: {}   Completed: {}   Rate: {}%",
        stats.goals.total, stats.goals.completed, stats.goals.completion_rate
    );
    println!();

    println!("SKILLS");
    println!(
        "   Hours: {}   Sessions: {}   Active: {}",
        stats.skills.total_hours, stats.skills.total_sessions, stats.skills.active_skills
    );
    println!();

    println!("REFLECTIONS");
    println!(
        "   Total: {}   Completed: {}",
        stats.reflections.total, stats.reflections.completed
    );
    println!();

    println!("WEEK BY WEEK");
    for chunk in &stats.weekly_progress {
        println!(
            "   {} — {}  {:>3} tasks, {:>3} completed ({}%)",
            chunk.week_start,
            chunk.week_end,
            chunk.total_tasks,
            chunk.completed_tasks,
            chunk.completion_rate
        );
    }
    println!();
}

fn print_monthly_markdown(stats: &MonthlyStats) {
    println!("# {} {}", stats.month_period.month, stats.month_period.year);
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Tasks | {} |", stats.tasks.total);
    println!("| Completed | {} |", stats.tasks.completed);
    println!("| Completion rate | {}% |", stats.tasks.completion_rate);
    println!("| Goals completed | {}/{} |", stats.goals.completed, stats.goals.total);
    println!("| Practice hours | {} |", stats.skills.total_hours);
    println!("| Reflections | {} |", stats.reflections.total);
    println!();

    println!("## Week by week");
    println!();
    println!("| Week | Tasks | Completed | Rate |");
    println!("|------|-------|-----------|------|");
    for chunk in &stats.weekly_progress {
        println!(
            "| {} — {} | {} | {} | {}% |",
            chunk.week_start, chunk.week_end, chunk.total_tasks, chunk.completed_tasks, chunk.completion_rate
        );
    }
    println!();
    println!("---");
    println!("*Generated by momentum-report*");
}

// ============================================
// Demo seeding
// ============================================

/// Insert two weeks of demo records so a fresh install has something to
/// report on. Intentionally goes through the same mutation paths the
/// app uses (status updates, goal progress, practice logging).
fn seed_demo(db: &Database, user: &str, clock: &dyn Clock) -> Result<()> {
    let now = clock.now();
    let day = |offset: u64, hour: u32| -> DateTime<Utc> {
        (clock.today() - Days::new(offset))
            .and_hms_opt(hour, 0, 0)
            .expect("valid demo time")
            .and_utc()
    };

    // A two-week task history with a live 4-day streak.
    for offset in 0..14u64 {
        let priority = match offset % 3 {
            0 => TaskPriority::High,
            1 => TaskPriority::Medium,
            _ => TaskPriority::Low,
        };
        let task = Task::new(user, format!("Demo task {}", offset + 1), priority, day(offset, 9));
        db.insert_task(&task)?;

        let completes = offset < 4 || offset % 2 == 1;
        if completes {
            db.set_task_status(user, &task.id, TaskStatus::Completed, day(offset, 18))?;
        }
    }

    let goal = Goal::new(
        user,
        "Close out ten demo tasks",
        10,
        GoalPeriod::Monthly,
        now - chrono::Duration::days(20),
        now + chrono::Duration::days(10),
    );
    db.insert_goal(&goal)?;
    db.update_goal_progress(user, &goal.id, 9)?;

    let skill = Skill::new(user, "Touch typing", SkillCategory::Other, now);
    db.insert_skill(&skill)?;
    for offset in [1u64, 3, 5, 8] {
        db.log_practice(user, &skill.id, day(offset, 20), 45, None)?;
    }

    for weeks_back in 1..=4u64 {
        let monday = {
            let today = clock.today();
            let this_monday =
                today - Days::new(chrono::Datelike::weekday(&today).num_days_from_monday() as u64);
            this_monday - Days::new(7 * weeks_back)
        };
        db.insert_reflection(&Reflection::new(user, monday, 8, Mood::Good, now))?;
    }

    Ok(())
}
