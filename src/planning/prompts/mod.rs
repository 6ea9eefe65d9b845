// ABOUTME: Prompt text for the plan generation capability
// ABOUTME: System prompt loaded at compile time plus renderers for run context and corrections
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt::Write;

use super::PlanningContext;

/// Planning coach system prompt describing the output shape and rules
pub const PLAN_SYSTEM_PROMPT: &str = include_str!("plan_system.md");

/// Render the run context as the user message
#[must_use]
pub fn render_context(context: &PlanningContext) -> String {
    let mut message = String::with_capacity(1024);
    let metrics = &context.metrics;

    let _ = writeln!(message, "Current date: {}", context.date.format("%Y-%m-%d"));
    let _ = writeln!(message, "Reason for this plan: {}", context.decision);
    let _ = writeln!(message, "Progress report: {}", context.report);
    let _ = writeln!(
        message,
        "Daily calorie target: {:.0} kcal",
        metrics.target_calories
    );

    message.push_str("\n## Today's log\n");
    let _ = writeln!(
        message,
        "Calories consumed: {:.0} kcal",
        context.record.calories_consumed
    );
    let _ = writeln!(message, "Steps: {}", context.record.steps);
    if let Some(weight) = context.record.weight_kg {
        let _ = writeln!(message, "Weight: {weight:.1} kg");
    }

    if let Some(profile) = &context.profile {
        message.push_str("\n## Profile\n");
        let _ = writeln!(
            message,
            "{}, {} years, {:.0} cm, {:.1} kg, {}",
            profile.sex.as_str(),
            profile.age_years,
            profile.height_cm,
            profile.weight_kg,
            profile.activity_level.as_str().replace('_', " ")
        );
        if !profile.goal.trim().is_empty() {
            let _ = writeln!(message, "Goal: {}", profile.goal.trim());
        }
    }

    match &context.prior_plan {
        Some(plan) => {
            message.push_str("\n## Current plan\n");
            let _ = writeln!(
                message,
                "Version {}: \"{}\" ({} days)",
                plan.version, plan.title, plan.duration_days
            );
            let _ = writeln!(message, "Reasoning: {}", plan.reasoning);
            if let Some(average) = plan.average_planned_kcal() {
                let _ = writeln!(message, "Average planned intake: {average:.0} kcal/day");
            }
            for day in &plan.daily_plans {
                let meals = day
                    .meals
                    .iter()
                    .map(|m| format!("{} {} ({} kcal)", m.meal_type, m.suggestion, m.estimated_kcal))
                    .collect::<Vec<_>>()
                    .join("; ");
                let _ = writeln!(
                    message,
                    "Day {}: {meals}. Activity: {} {} min",
                    day.day_index, day.activity.activity_type, day.activity.duration_minutes
                );
            }
        }
        None => message.push_str("\nThere is no current plan.\n"),
    }

    message.push_str("\nReturn the new plan as a single JSON object.");
    message
}

/// Render the follow-up instruction sent after a rejected candidate
#[must_use]
pub fn render_correction(violation: &str) -> String {
    format!(
        "Your previous plan was rejected: {violation}. \
         Return a complete corrected plan as a single JSON object that satisfies every rule."
    )
}
