use anyhow::Result;

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Map timeframe string to Binance kline interval string
pub fn map_timeframe_to_interval(timeframe: &str) -> Result<String> {
    match timeframe.to_lowercase().as_str() {
        "1m" => Ok("1m".to_string()),
        "5m" => Ok("5m".to_string()),
        "15m" => Ok("15m".to_string()),
        "1h" => Ok("1h".to_string()),
        "4h" => Ok("4h".to_string()),
        "1d" => Ok("1d".to_string()),
        "1w" => Ok("1w".to_string()),
        _ => anyhow::bail!("Unsupported timeframe: {}", timeframe),
    }
}

/// Width of one candle for a timeframe, in milliseconds
pub fn interval_period_ms(timeframe: &str) -> Result<u64> {
    match map_timeframe_to_interval(timeframe)?.as_str() {
        "1m" => Ok(MINUTE_MS),
        "5m" => Ok(5 * MINUTE_MS),
        "15m" => Ok(15 * MINUTE_MS),
        "1h" => Ok(HOUR_MS),
        "4h" => Ok(4 * HOUR_MS),
        "1d" => Ok(DAY_MS),
        "1w" => Ok(7 * DAY_MS),
        other => anyhow::bail!("Unsupported timeframe: {}", other),
    }
}

/// Validate a `BASE/QUOTE` pair: two non-empty alphanumeric legs.
pub fn validate_symbol(symbol: &str) -> Result<()> {
    let Some((base, quote)) = symbol.split_once('/') else {
        anyhow::bail!("Invalid symbol {symbol:?}: expected BASE/QUOTE");
    };

    if base.is_empty() || quote.is_empty() || symbol.len() > 20 {
        anyhow::bail!("Invalid symbol {symbol:?}: legs must be non-empty and at most 20 characters total");
    }

    if !base.chars().chain(quote.chars()).all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("Invalid symbol {symbol:?}: only alphanumeric characters allowed");
    }

    Ok(())
}

/// `BTC/USDT` -> `BTCUSDT`
pub fn to_exchange_symbol(symbol: &str) -> String {
    symbol.replace('/', "").to_uppercase()
}

/// `BTC/USDT` -> `BTC`
pub fn base_asset(symbol: &str) -> &str {
    symbol.split_once('/').map(|(base, _)| base).unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframes() {
        assert_eq!(map_timeframe_to_interval("1D").unwrap(), "1d");
        assert!(map_timeframe_to_interval("2d").is_err());
        assert_eq!(interval_period_ms("1d").unwrap(), 86_400_000);
    }

    #[test]
    fn test_symbol_helpers() {
        assert!(validate_symbol("BTC/USDT").is_ok());
        assert!(validate_symbol("BTCUSDT").is_err());
        assert!(validate_symbol("BTC/").is_err());
        assert!(validate_symbol("../USDT").is_err());
        assert_eq!(to_exchange_symbol("eth/usdt"), "ETHUSDT");
        assert_eq!(base_asset("SOL/USDT"), "SOL");
        assert_eq!(base_asset("SOL"), "SOL");
    }
}
