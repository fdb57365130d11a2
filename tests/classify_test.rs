#[cfg(test)]
mod tests {
    use smart_money::analysis::classify::{classify, filter_view, AlertKind, Thresholds};
    use smart_money::analysis::metrics::{compute_record, MetricRecord};
    use smart_money::data::types::{Candle, CompletedPair};

    fn create_record(asset: &str, price_change: f64, volume_change: f64, volatility: f64) -> MetricRecord {
        MetricRecord {
            symbol: format!("{asset}/USDT"),
            asset: asset.to_string(),
            price: 100.0,
            price_change_pct: price_change,
            volume_change_pct: volume_change,
            volatility_pct: volatility,
            volume: 1000.0,
        }
    }

    fn create_table() -> Vec<MetricRecord> {
        vec![
            create_record("BTC", 1.0, 25.0, 2.0),    // quiet
            create_record("ETH", -8.0, 120.0, 9.0),  // spike + volatile
            create_record("SOL", 2.5, 60.0, 4.0),    // spike + quiet
            create_record("XRP", 3.0, 60.0, 5.0),    // spike only (boundaries)
            create_record("DOGE", 0.0, 0.0, 12.0),   // volatile
            create_record("ADA", -2.9, 20.0, 1.0),   // nothing (volume on boundary)
            create_record("AVAX", 0.5, 50.0, 6.0),   // quiet + volatile (spike boundary)
        ]
    }

    fn assets(view: &[MetricRecord]) -> Vec<&str> {
        view.iter().map(|r| r.asset.as_str()).collect()
    }

    #[test]
    fn test_volume_spike_view() {
        let views = classify(&create_table(), &Thresholds::default());
        assert_eq!(assets(&views.volume_spike), vec!["ETH", "SOL", "XRP"]);
    }

    #[test]
    fn test_quiet_accumulation_view() {
        let views = classify(&create_table(), &Thresholds::default());
        assert_eq!(assets(&views.quiet_accumulation), vec!["SOL", "AVAX", "BTC"]);
    }

    #[test]
    fn test_volatility_expansion_view() {
        let views = classify(&create_table(), &Thresholds::default());
        assert_eq!(assets(&views.volatility_expansion), vec!["DOGE", "ETH", "AVAX"]);
    }

    #[test]
    fn test_views_are_sorted_descending() {
        let views = classify(&create_table(), &Thresholds::default());
        for kind in AlertKind::ALL {
            let keys: Vec<f64> = views.view(kind).iter().map(|r| kind.sort_key(r)).collect();
            assert!(keys.windows(2).all(|w| w[0] >= w[1]), "{kind:?} not sorted: {keys:?}");
        }
    }

    #[test]
    fn test_views_are_subsets() {
        let table = create_table();
        let views = classify(&table, &Thresholds::default());
        for kind in AlertKind::ALL {
            for record in views.view(kind) {
                assert!(table.contains(record));
                assert!(kind.matches(record, &Thresholds::default()));
            }
        }
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let table = vec![
            create_record("LTC", 0.0, 70.0, 1.0),
            create_record("BCH", 0.0, 80.0, 1.0),
            create_record("UNI", 0.0, 70.0, 1.0),
            create_record("XLM", 0.0, 70.0, 1.0),
        ];
        let view = filter_view(&table, AlertKind::VolumeSpike, &Thresholds::default());
        assert_eq!(assets(&view), vec!["BCH", "LTC", "UNI", "XLM"]);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let table = create_table();
        let first = classify(&table, &Thresholds::default());
        let second = classify(&table, &Thresholds::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_table_gives_empty_views() {
        let views = classify(&[], &Thresholds::default());
        assert!(views.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            volume_spike_pct: 100.0,
            volatility_pct: 10.0,
            ..Thresholds::default()
        };
        let views = classify(&create_table(), &thresholds);
        assert_eq!(assets(&views.volume_spike), vec!["ETH"]);
        assert_eq!(assets(&views.volatility_expansion), vec!["DOGE"]);
    }

    fn candle(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            time_open: 0,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn test_computed_three_percent_move_is_not_quiet() {
        let pair = CompletedPair {
            yesterday: candle(100.0, 104.0, 99.0, 103.0, 1600.0),
            day_before: candle(99.0, 101.0, 98.0, 100.0, 1000.0),
        };
        let record = compute_record("TRX/USDT", &pair).unwrap();
        let views = classify(&[record], &Thresholds::default());

        assert!(views.quiet_accumulation.is_empty());
        assert_eq!(assets(&views.volume_spike), vec!["TRX"]);
    }

    #[test]
    fn test_zero_previous_volume_is_not_spike_or_quiet() {
        let pair = CompletedPair {
            yesterday: candle(100.0, 101.0, 99.0, 100.0, 500.0),
            day_before: candle(100.0, 101.0, 99.0, 100.0, 0.0),
        };
        let record = compute_record("FIL/USDT", &pair).unwrap();
        let views = classify(&[record], &Thresholds::default());

        assert!(views.volume_spike.is_empty());
        assert!(views.quiet_accumulation.is_empty());
    }

    #[test]
    fn test_wide_range_is_volatile() {
        let pair = CompletedPair {
            yesterday: candle(102.0, 110.0, 100.0, 105.0, 1000.0),
            day_before: candle(100.0, 101.0, 99.0, 100.0, 1000.0),
        };
        let record = compute_record("NEAR/USDT", &pair).unwrap();
        let views = classify(&[record], &Thresholds::default());
        assert_eq!(assets(&views.volatility_expansion), vec!["NEAR"]);
    }
}
