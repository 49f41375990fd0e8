// ==========================================
// AnomalyDetector 引擎集成测试
// ==========================================
// 测试目标: 四类检查的触发条件、严重度升级与主类型选择
// 说明: 默认阈值 2.0 下骤降偏离不可能超过 1.0,
//       骤降与 ROAS 离群用例需要调低阈值
// ==========================================

mod helpers;

use ad_budget_allocator::config::AllocationConfig;
use ad_budget_allocator::domain::types::{AnomalyType, Severity};
use ad_budget_allocator::engine::AnomalyDetector;
use helpers::test_data_builder::SnapshotBuilder;

fn config_with_threshold(threshold: f64) -> AllocationConfig {
    AllocationConfig {
        anomaly_threshold: threshold,
        ..AllocationConfig::default()
    }
}

// ==========================================
// 数据缺失
// ==========================================

#[test]
fn test_missing_data_flagged_high() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 预算 100 但 30 天零消耗
    let snapshot = SnapshotBuilder::new("C001").budget(100.0).build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    assert!(finding.is_missing_data());
    assert_eq!(finding.anomaly_type, Some(AnomalyType::MissingData));
    assert_eq!(finding.severity, Some(Severity::High));
    assert!(finding.recommendation.is_some());
}

// ==========================================
// 消耗突增 / 骤降
// ==========================================

#[test]
fn test_spend_spike_medium_severity() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 7天日均 40 对 30天日均 10: 偏离 300% > 200% 阈值, 未到 2 倍阈值
    // 销售额与消耗同比例, ROAS 两窗口一致, 不触发离群检查
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(280.0, 560.0, 35, 700, 20_000)
        .window_14d(300.0, 600.0, 36, 720, 21_000)
        .window_30d(300.0, 600.0, 36, 720, 21_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Spike));
    assert_eq!(finding.severity, Some(Severity::Medium));
    assert_eq!(finding.triggers.len(), 1);
}

#[test]
fn test_spend_spike_escalates_to_high() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 7天日均 60 对 30天日均 10: 偏离 500% > 2×阈值
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(420.0, 840.0, 42, 840, 24_000)
        .window_14d(300.0, 600.0, 36, 720, 21_000)
        .window_30d(300.0, 600.0, 36, 720, 21_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Spike));
    assert_eq!(finding.severity, Some(Severity::High));
}

#[test]
fn test_spend_drop_detected_with_tight_threshold() {
    let detector = AnomalyDetector::new();
    // 骤降偏离上限为 100%, 阈值 0.5 才可检出
    let config = config_with_threshold(0.5);

    // 7天日均 30 对 30天日均 100: 偏离 70%, 未到 2×阈值
    let snapshot = SnapshotBuilder::new("C001")
        .budget(120.0)
        .window_7d(210.0, 420.0, 21, 420, 12_000)
        .window_14d(1_400.0, 2_800.0, 140, 2_800, 80_000)
        .window_30d(3_000.0, 6_000.0, 300, 6_000, 170_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Drop));
    assert_eq!(finding.severity, Some(Severity::Medium));
}

// ==========================================
// ROAS 离群
// ==========================================

#[test]
fn test_roas_outlier_with_stable_spend() {
    let detector = AnomalyDetector::new();
    let config = config_with_threshold(0.5);

    // 消耗两窗口一致 (日均 50), 仅 ROAS 偏离: 7天 4.0 对 30天 2.0 ⇒ 100%
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(350.0, 1_400.0, 35, 700, 20_000)
        .window_14d(700.0, 1_400.0, 70, 1_400, 40_000)
        .window_30d(1_500.0, 3_000.0, 150, 3_000, 90_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Outlier));
    assert_eq!(finding.severity, Some(Severity::Medium));
}

// ==========================================
// CVR 越界
// ==========================================

#[test]
fn test_cvr_out_of_sane_range() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 7天 CVR 80%: 消耗与 ROAS 均稳定, 只有归因指标越界
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(350.0, 700.0, 80, 100, 20_000)
        .window_14d(700.0, 1_400.0, 70, 1_400, 40_000)
        .window_30d(1_500.0, 3_000.0, 150, 3_000, 90_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Outlier));
    assert_eq!(finding.severity, Some(Severity::Medium));
    assert!(finding.triggers[0].contains("CVR"));
}

#[test]
fn test_cvr_check_skipped_without_clicks() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 零点击时 CVR 无意义, 不得触发越界检查
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(350.0, 700.0, 0, 0, 20_000)
        .window_14d(700.0, 1_400.0, 0, 0, 40_000)
        .window_30d(1_500.0, 3_000.0, 0, 0, 90_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(!finding.has_anomaly);
}

// ==========================================
// 多项检出
// ==========================================

#[test]
fn test_multiple_checks_keep_all_triggers() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    // 消耗突增 (high, 偏离 500%) + ROAS 离群 (medium, 偏离 250%)
    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .window_7d(420.0, 2_940.0, 70, 1_400, 24_000)
        .window_14d(300.0, 600.0, 36, 720, 21_000)
        .window_30d(300.0, 600.0, 36, 720, 21_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(finding.has_anomaly);
    // 主类型取最高严重度的检出项
    assert_eq!(finding.anomaly_type, Some(AnomalyType::Spike));
    assert_eq!(finding.severity, Some(Severity::High));
    // 所有触发说明保留
    assert_eq!(finding.triggers.len(), 2);
}

// ==========================================
// 正常数据
// ==========================================

#[test]
fn test_clean_campaign_has_no_anomaly() {
    let detector = AnomalyDetector::new();
    let config = AllocationConfig::default();

    let snapshot = SnapshotBuilder::new("C001")
        .budget(100.0)
        .steady_daily(60.0, 120.0, 6, 200, 6_000)
        .build();

    let finding = detector.detect(&snapshot, &config);
    assert!(!finding.has_anomaly);
    assert!(finding.anomaly_type.is_none());
    assert!(finding.severity.is_none());
    assert!(finding.triggers.is_empty());
    assert!(finding.recommendation.is_none());
}
