// ==========================================
// SuggestionComposer 引擎集成测试
// ==========================================
// 测试目标: 调整幅度推导、限幅、数据缺失清零、最低预算兜底、
//           风险评定与置信度
// ==========================================

mod helpers;

use ad_budget_allocator::config::AllocationConfig;
use ad_budget_allocator::domain::anomaly::AnomalyFinding;
use ad_budget_allocator::domain::marginal::MarginalBenefitCurve;
use ad_budget_allocator::domain::score::MultiDimensionalScore;
use ad_budget_allocator::domain::types::{
    AnomalyType, ReasonCategory, RiskLevel, Severity, SuggestionStatus,
};
use ad_budget_allocator::engine::SuggestionComposer;
use helpers::test_data_builder::SnapshotBuilder;

/// 固定综合分的评分 (子分数同值, 不带解释)
fn score_with(composite: f64, stability: f64) -> MultiDimensionalScore {
    MultiDimensionalScore {
        conversion_efficiency: composite,
        roas: composite,
        growth_potential: composite,
        stability,
        trend: composite,
        composite,
        reasons: Vec::new(),
    }
}

/// 最优预算等于当前预算的平坦曲线 (不触发边际微调)
fn flat_curve(budget: f64) -> MarginalBenefitCurve {
    MarginalBenefitCurve {
        points: Vec::new(),
        marginal_roas: 0.0,
        diminishing_point: None,
        max_efficiency_budget: budget,
        optimal_budget: budget,
    }
}

fn missing_data_finding() -> AnomalyFinding {
    AnomalyFinding {
        has_anomaly: true,
        anomaly_type: Some(AnomalyType::MissingData),
        severity: Some(Severity::High),
        triggers: vec!["30天消耗为 0".to_string()],
        recommendation: Some("补齐历史数据前不做预算调整".to_string()),
    }
}

// ==========================================
// 调整幅度推导
// ==========================================

#[test]
fn test_high_composite_clamped_to_max_adjustment() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig {
        max_adjustment_percent: 15.0,
        ..AllocationConfig::default()
    };
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 综合分 95: 原始幅度 (95-50)/50*20 = 18%, 限幅到 15%
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(95.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.adjustment_percent - 15.0).abs() < 1e-9);
    assert!((suggestion.suggested_budget - 115.0).abs() < 1e-9);
    assert!((suggestion.adjustment_amount - 15.0).abs() < 1e-9);
    assert_eq!(suggestion.status, SuggestionStatus::Pending);
}

#[test]
fn test_increase_band_formula() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 综合分 80: (80-50)/50*20 = 12%
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(80.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.adjustment_percent - 12.0).abs() < 1e-9);
    assert!(suggestion
        .reasons
        .iter()
        .any(|r| r.category == ReasonCategory::Composite));
}

#[test]
fn test_decrease_band_formula() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 综合分 20: (20-50)/50*20 = -12%
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(20.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.adjustment_percent + 12.0).abs() < 1e-9);
    assert!((suggestion.suggested_budget - 88.0).abs() < 1e-9);
}

#[test]
fn test_neutral_band_small_adjustment() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 综合分 60: 中性区间, (60-50)/50*5 = 1%
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(60.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.adjustment_percent - 1.0).abs() < 1e-9);

    // 综合分正好 50: 完全不动
    let unchanged = composer.compose(
        "G1",
        &snapshot,
        score_with(50.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );
    assert!((unchanged.adjustment_percent - 0.0).abs() < 1e-9);
    assert!((unchanged.suggested_budget - 100.0).abs() < 1e-9);
}

// ==========================================
// 边际微调
// ==========================================

#[test]
fn test_marginal_nudge_up_and_down() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 最优预算 120 > 110: 追加 +5 ⇒ 12 + 5 = 17%
    let raised = composer.compose(
        "G1",
        &snapshot,
        score_with(80.0, 100.0),
        flat_curve(120.0),
        &AnomalyFinding::none(),
        &config,
    );
    assert!((raised.adjustment_percent - 17.0).abs() < 1e-9);
    assert!(raised
        .reasons
        .iter()
        .any(|r| r.category == ReasonCategory::MarginalHeadroom));

    // 最优预算 85 < 90: 追加 -5 ⇒ 12 - 5 = 7%
    let lowered = composer.compose(
        "G1",
        &snapshot,
        score_with(80.0, 100.0),
        flat_curve(85.0),
        &AnomalyFinding::none(),
        &config,
    );
    assert!((lowered.adjustment_percent - 7.0).abs() < 1e-9);
    assert!(lowered
        .reasons
        .iter()
        .any(|r| r.category == ReasonCategory::MarginalContraction));
}

// ==========================================
// 数据缺失清零
// ==========================================

#[test]
fn test_missing_data_zeroes_adjustment() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001").budget(100.0).build();

    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(90.0, 0.0),
        flat_curve(100.0),
        &missing_data_finding(),
        &config,
    );

    assert!((suggestion.adjustment_percent - 0.0).abs() < 1e-9);
    assert!((suggestion.suggested_budget - 100.0).abs() < 1e-9);
    assert!(suggestion
        .reasons
        .iter()
        .any(|r| r.category == ReasonCategory::AnomalySuppression));
    // 高严重度异常直接映射高风险
    assert_eq!(suggestion.risk_level, RiskLevel::High);
}

// ==========================================
// 最低日预算兜底
// ==========================================

#[test]
fn test_min_daily_budget_floor() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    // 预算 1.0 且综合分 20: 原始建议 0.88 < 下限 1.0
    let snapshot = SnapshotBuilder::new("C001")
        .budget(1.0)
        .steady_daily(0.6, 0.3, 1, 20, 600)
        .build();

    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(20.0, 100.0),
        flat_curve(1.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.suggested_budget - 1.0).abs() < 1e-9);
    // 兜底后按最终建议重算: 调整量与幅度都归零
    assert!((suggestion.adjustment_amount - 0.0).abs() < 1e-9);
    assert!((suggestion.adjustment_percent - 0.0).abs() < 1e-9);
    assert!(suggestion
        .reasons
        .iter()
        .any(|r| r.category == ReasonCategory::BudgetFloor));
}

// ==========================================
// 风险因子
// ==========================================

#[test]
fn test_risk_factors_for_large_unstable_adjustment() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 综合分 85 (+14%) 且稳定性 30: 两个风险因子, 但无异常仍为低风险
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(85.0, 30.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert_eq!(suggestion.risk_level, RiskLevel::Low);
    assert_eq!(suggestion.risk_factors.len(), 2);
}

// ==========================================
// 置信度
// ==========================================

#[test]
fn test_confidence_high_for_stable_rich_sample() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 70 + 15 (稳定性>70) = 85
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(60.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );
    assert!((suggestion.confidence - 85.0).abs() < 1e-9);
}

#[test]
fn test_confidence_clamped_at_lower_bound() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    // 30天消耗 0 < 100: 样本稀薄
    let snapshot = SnapshotBuilder::new("C001").budget(100.0).build();

    // 70 - 20 (稳定性<40) - 15 (异常) - 10 (样本稀薄) = 25 ⇒ 下限 30
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(50.0, 0.0),
        flat_curve(100.0),
        &missing_data_finding(),
        &config,
    );
    assert!((suggestion.confidence - 30.0).abs() < 1e-9);
}

// ==========================================
// 调整后预测
// ==========================================

#[test]
fn test_predicted_metrics_preserved_when_budget_unchanged() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // 预算不变: 预测指标等于 30 天实际
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(50.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.predicted.spend - 1_800.0).abs() < 1e-9);
    assert!((suggestion.predicted.sales - 3_600.0).abs() < 1e-9);
    assert!((suggestion.predicted.conversions - 180.0).abs() < 1e-9);
    assert!((suggestion.predicted.roas - 2.0).abs() < 1e-9);
}

#[test]
fn test_predicted_sales_discounted_on_increase() {
    let composer = SuggestionComposer::new();
    let config = AllocationConfig::default();
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    // +12% 预算: 消耗线性放大, 销售套用递减修正 ⇒ 预测 ROAS 低于当前
    let suggestion = composer.compose(
        "G1",
        &snapshot,
        score_with(80.0, 100.0),
        flat_curve(100.0),
        &AnomalyFinding::none(),
        &config,
    );

    assert!((suggestion.predicted.spend - 1_800.0 * 1.12).abs() < 1e-6);
    assert!(suggestion.predicted.roas < 2.0);
    assert!(suggestion.predicted.roas > 0.0);
}
