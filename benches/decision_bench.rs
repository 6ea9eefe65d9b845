// ABOUTME: Criterion benchmarks for compliance evaluation, decision routing, and candidate validation
// ABOUTME: Measures the pure per-run work done between fetching data and calling the planner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the replanning decision path.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pierre_replanner::intelligence::{decide, evaluate, DecisionRouter};
use pierre_replanner::models::{
    Activity, DailyPlan, HealthRecord, Meal, MealType, PlanDraft,
};
use pierre_replanner::planning::PlanCandidate;
use serde_json::json;

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default()
}

fn plan(days: u32) -> PlanDraft {
    PlanDraft {
        user_id: "bench".to_owned(),
        version: 3,
        title: "Benchmark plan".to_owned(),
        duration_days: days,
        reasoning: "Benchmark".to_owned(),
        daily_plans: (1..=days)
            .map(|day_index| DailyPlan {
                day_index,
                meals: vec![Meal {
                    meal_type: MealType::Lunch,
                    suggestion: "Rice bowl".to_owned(),
                    estimated_kcal: 650,
                }],
                activity: Activity {
                    activity_type: "Walking".to_owned(),
                    duration_minutes: 30,
                    description: "Easy pace".to_owned(),
                },
            })
            .collect(),
    }
}

fn candidate(days: u32) -> String {
    let daily_plans: Vec<_> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "meals": [
                    { "meal_type": "Breakfast", "suggestion": "Oats", "estimated_kcal": 420 },
                    { "meal_type": "Lunch", "suggestion": "Chicken salad", "estimated_kcal": 610 },
                    { "meal_type": "Dinner", "suggestion": "Tofu stir fry", "estimated_kcal": 580 }
                ],
                "activity": { "activity_type": "Cycling", "duration_minutes": 45, "description": "Zone 2" }
            })
        })
        .collect();
    json!({
        "title": "Benchmark week",
        "duration_days": days,
        "reasoning": "Benchmark",
        "daily_plans": daily_plans
    })
    .to_string()
}

fn bench_evaluate_and_decide(c: &mut Criterion) {
    let active = plan(7).into_plan(Utc::now());
    let records = [
        ("maintain", HealthRecord::new("bench", bench_date(), 1_900.0, 6_000)),
        ("high_calories", HealthRecord::new("bench", bench_date(), 2_600.0, 8_000)),
        ("low_activity", HealthRecord::new("bench", bench_date(), 1_800.0, 2_000)),
    ];

    let mut group = c.benchmark_group("evaluate_and_decide");
    for (name, record) in &records {
        group.bench_with_input(BenchmarkId::from_parameter(name), record, |b, record| {
            b.iter(|| {
                let metrics = evaluate(Some(&active), black_box(record), 2_000.0);
                metrics.map(|m| decide(true, &m))
            });
        });
    }
    group.finish();

    c.bench_function("router_fsm", |b| {
        let (_, record) = &records[1];
        b.iter(|| {
            let mut router = DecisionRouter::default();
            let metrics = evaluate(Some(&active), black_box(record), 2_000.0)?;
            router.observe(true, metrics)?;
            router.decide()
        });
    });
}

fn bench_candidate_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_validation");
    for days in [1_u32, 7, 28] {
        let raw = candidate(days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &raw, |b, raw| {
            b.iter(|| PlanCandidate::parse(black_box(raw)).and_then(|c| c.validate("bench", 4)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate_and_decide, bench_candidate_validation);
criterion_main!(benches);
