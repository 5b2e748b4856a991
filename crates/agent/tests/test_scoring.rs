//! Tests for candidate joining, normalization, weighting and trade-offs

use carbonroute_agent::scoring::{
    build_candidates, normalize, rank, score, trade_offs, Candidate, Weights,
};
use carbonroute_agent::Priority;
use serde_json::json;

fn candidate(id: &str, cost: f64, days: f64, emissions: f64) -> Candidate {
    Candidate {
        route_id: id.to_string(),
        name: id.to_uppercase(),
        modes: vec!["sea".to_string()],
        base_cost_usd: cost,
        regulatory_cost_usd: 0.0,
        total_cost_usd: cost,
        transit_days: days,
        total_emissions_kg: emissions,
        compliance_status: "compliant".to_string(),
        segments: Vec::new(),
        score: 0.0,
    }
}

#[test]
fn test_weights_sum_to_one() {
    for priority in Priority::ALL {
        let w = Weights::for_priority(priority);
        assert!((w.cost + w.time + w.emissions - 1.0).abs() < 1e-9);
    }
    assert_eq!(Weights::for_priority(Priority::Carbon).emissions, 0.70);
    assert_eq!(Weights::for_priority(Priority::Speed).time, 0.70);
    assert_eq!(Weights::for_priority(Priority::Cost).cost, 0.70);
    assert_eq!(Weights::for_priority(Priority::Balanced).emissions, 0.34);
}

#[test]
fn test_normalize_bounds() {
    assert_eq!(normalize(10.0, 10.0, 20.0), 1.0);
    assert_eq!(normalize(20.0, 10.0, 20.0), 0.0);
    assert_eq!(normalize(15.0, 10.0, 20.0), 0.5);
}

#[test]
fn test_equal_metric_scores_one_for_everyone() {
    assert_eq!(normalize(7.0, 7.0, 7.0), 1.0);

    // every metric equal: every candidate gets the full weight sum
    let mut set = vec![
        candidate("a", 100.0, 5.0, 300.0),
        candidate("b", 100.0, 5.0, 300.0),
        candidate("c", 100.0, 5.0, 300.0),
    ];
    for priority in Priority::ALL {
        score(&mut set, priority);
        for c in &set {
            assert!((c.score - 1.0).abs() < 1e-9, "{:?} {}", priority, c.score);
        }
    }
}

#[test]
fn test_single_candidate_scores_one() {
    let ranked = rank(vec![candidate("only", 1.0, 1.0, 1.0)], Priority::Balanced);
    assert!((ranked[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn test_dominating_route_never_scores_lower() {
    let sets = [
        (candidate("a", 100.0, 5.0, 200.0), candidate("b", 200.0, 9.0, 900.0)),
        (candidate("a", 100.0, 5.0, 200.0), candidate("b", 100.5, 5.1, 200.1)),
        (candidate("a", 0.0, 0.0, 0.0), candidate("b", 1e6, 1e3, 1e6)),
    ];

    for (a, b) in sets {
        for priority in Priority::ALL {
            let mut pair = vec![a.clone(), b.clone()];
            score(&mut pair, priority);
            assert!(pair[0].score >= pair[1].score, "{:?}", priority);
        }
    }
}

#[test]
fn test_dominance_holds_with_bystanders() {
    let a = candidate("a", 150.0, 6.0, 250.0);
    let b = candidate("b", 160.0, 7.0, 260.0);
    let others = [
        candidate("cheap", 50.0, 30.0, 600.0),
        candidate("fast", 900.0, 1.0, 5000.0),
    ];

    for priority in Priority::ALL {
        let mut set = vec![b.clone(), a.clone(), others[0].clone(), others[1].clone()];
        score(&mut set, priority);
        assert!(set[1].score >= set[0].score, "{:?}", priority);
    }
}

#[test]
fn test_rank_follows_priority() {
    let set = vec![
        candidate("sea", 2000.0, 33.0, 2000.0),
        candidate("air", 38000.0, 2.0, 50000.0),
        candidate("rail", 8000.0, 18.0, 1900.0),
    ];

    assert_eq!(rank(set.clone(), Priority::Speed)[0].route_id, "air");
    assert_eq!(rank(set.clone(), Priority::Carbon)[0].route_id, "rail");
    assert_eq!(rank(set, Priority::Cost)[0].route_id, "sea");
}

#[test]
fn test_rank_ties_keep_input_order() {
    let set = vec![
        candidate("first", 10.0, 1.0, 1.0),
        candidate("second", 10.0, 1.0, 1.0),
        candidate("third", 10.0, 1.0, 1.0),
    ];
    let ranked = rank(set, Priority::Balanced);
    let order: Vec<&str> = ranked.iter().map(|c| c.route_id.as_str()).collect();
    assert_eq!(order, vec!["first", "second", "third"]);
}

#[test]
fn test_build_candidates_joins_by_route_id() {
    let routes = vec![
        json!({"id": "r1", "name": "Sea", "modes": ["sea"], "total_cost_usd": 2000,
               "transit_days": 30, "segments": [{"mode": "sea"}]}),
        json!({"id": "r2", "name": "Air", "modes": ["air"], "base_cost_usd": "9000",
               "transit_days": 2}),
        json!({"id": "r3", "transit_days": 10}),
    ];
    let emissions = vec![
        json!({"route_id": "r2", "total_emissions_kg": 40000}),
        json!({"route_id": "r1", "total_emissions_kg": 1500.5}),
    ];
    let compliance = vec![json!({
        "route_id": "r1", "compliance_status": "non_compliant", "total_compliance_cost": 250.25
    })];

    let cands = build_candidates(&routes, &emissions, &compliance);
    assert_eq!(cands.len(), 3);

    assert_eq!(cands[0].route_id, "r1");
    assert_eq!(cands[0].base_cost_usd, 2000.0);
    assert_eq!(cands[0].regulatory_cost_usd, 250.25);
    assert_eq!(cands[0].total_cost_usd, 2250.25);
    assert_eq!(cands[0].total_emissions_kg, 1500.5);
    assert_eq!(cands[0].compliance_status, "non_compliant");
    assert_eq!(cands[0].segments.len(), 1);

    assert_eq!(cands[1].total_cost_usd, 9000.0);
    assert_eq!(cands[1].total_emissions_kg, 40000.0);
    assert_eq!(cands[1].compliance_status, "unknown");

    // nothing known beyond the id: zeros and the id as name
    assert_eq!(cands[2].name, "r3");
    assert_eq!(cands[2].total_cost_usd, 0.0);
    assert_eq!(cands[2].total_emissions_kg, 0.0);
    assert!(cands[2].modes.is_empty());
}

#[test]
fn test_non_finite_model_numbers_count_as_missing() {
    let routes = vec![
        json!({"id": "r1", "total_cost_usd": "NaN", "transit_days": "inf"}),
        json!({"id": "r2", "total_cost_usd": 1200, "transit_days": 12}),
    ];
    let emissions = vec![json!({"route_id": "r1", "total_emissions_kg": "NaN"})];

    let mut cands = build_candidates(&routes, &emissions, &[]);
    assert_eq!(cands[0].total_cost_usd, 0.0);
    assert_eq!(cands[0].transit_days, 0.0);
    assert_eq!(cands[0].total_emissions_kg, 0.0);

    score(&mut cands, Priority::Balanced);
    assert!(cands.iter().all(|c| c.score.is_finite()));

    let wire = serde_json::to_value(&cands).unwrap();
    assert!(wire[0]["score"].is_number());
}

#[test]
fn test_trade_offs_for_best_route() {
    let ranked = rank(
        vec![
            candidate("sea", 2000.0, 30.0, 1000.0),
            candidate("air", 10000.0, 2.0, 10000.0),
        ],
        Priority::Carbon,
    );
    let analysis = trade_offs(&ranked).unwrap();

    assert_eq!(analysis.cost_range.min, 2000.0);
    assert_eq!(analysis.cost_range.max, 10000.0);
    assert_eq!(analysis.cost_range.savings_vs_worst, 8000.0);
    assert_eq!(analysis.time_range.delay_vs_fastest, 28.0);
    assert_eq!(analysis.emissions_range.reduction_vs_worst_pct, 90.0);
    assert_eq!(analysis.key_insights.len(), 3);
    assert!(analysis.key_insights[0].contains("AIR"));
}

#[test]
fn test_trade_offs_empty_set() {
    assert!(trade_offs(&[]).is_none());
}
