//! Renders the shell script that replays exported trades against the
//! trading API with `curl` and `jq`.
//!
//! Record values are pasted into the command templates as they are. Nothing
//! is escaped, so a quote inside a symbol or a note breaks the script.

use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::MigrationError;
use crate::settings::ApiSettings;
use crate::trade::TradeRecord;

pub const SCRIPT_FILE: &str = "import_margin_trades.sh";

pub fn render(trades: &[TradeRecord], api: &ApiSettings) -> String {
    let base = api.base_url.trim_end_matches('/');
    let total = trades.len();
    let mut script = header(base, api, total);
    for (i, trade) in trades.iter().enumerate() {
        if has_quotes(&trade.symbol) || has_quotes(&trade.notes) {
            warn!(
                symbol = %trade.symbol,
                "Trade contains quote characters, the import script will be malformed"
            );
        }
        script.push_str(&trade_block(base, trade, i + 1, total));
    }
    script.push_str(&footer(&api.portfolio_type));
    script
}

pub fn write(path: &Path, script: &str) -> Result<(), MigrationError> {
    fs::write(path, script)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

fn has_quotes(s: &str) -> bool {
    s.contains('\'') || s.contains('"')
}

fn header(base: &str, api: &ApiSettings, total: usize) -> String {
    format!(
        r#"#!/bin/bash

echo "Importing margin trades..."

# Authenticate
TOKEN=$(curl -s -X POST {base}/api/auth/login \
  -H "Content-Type: application/json" \
  -d '{{"username": "{username}", "password": "{password}"}}' | jq -r '.token')

if [ "$TOKEN" = "null" ] || [ -z "$TOKEN" ]; then
    echo "Failed to obtain an auth token"
    exit 1
fi

echo "Token received"

# Resolve the portfolio to import into
PORTFOLIO_ID=$(curl -s -H "Authorization: Bearer $TOKEN" {base}/api/portfolios | jq -r '.[] | select(.type == "{kind}") | .id')

if [ "$PORTFOLIO_ID" = "null" ] || [ -z "$PORTFOLIO_ID" ]; then
    echo "No {kind} portfolio found"
    exit 1
fi

echo "Found {kind} portfolio with ID: $PORTFOLIO_ID"

IMPORTED=0
TOTAL={total}
"#,
        base = base,
        username = api.username,
        password = api.password,
        kind = api.portfolio_type,
        total = total,
    )
}

fn trade_block(base: &str, trade: &TradeRecord, n: usize, total: usize) -> String {
    let close = match trade.exit_price {
        Some(exit_price) => format!(
            r#"    echo "Closing trade {symbol} at {price}"
    curl -s -X POST "{base}/api/trades/$TRADE_ID/sell?exitPrice={price}" \
      -H "Authorization: Bearer $TOKEN" \
      -H "X-Portfolio-ID: $PORTFOLIO_ID" >/dev/null
"#,
            symbol = trade.symbol,
            price = exit_price,
            base = base,
        ),
        None => "    # position stays open\n".to_string(),
    };
    format!(
        r#"
echo "Importing trade {n}/{total}: {symbol}"

RESPONSE=$(curl -s -X POST {base}/api/trades/buy \
  -H "Content-Type: application/json" \
  -H "Authorization: Bearer $TOKEN" \
  -H "X-Portfolio-ID: $PORTFOLIO_ID" \
  -d '{{
    "symbol": "{symbol}",
    "entryPrice": {entry_price},
    "quantity": {quantity},
    "entryDate": "{entry_date}",
    "marginAmount": {margin_amount},
    "notes": "{notes}"
  }}')

if echo "$RESPONSE" | jq -e '.id' >/dev/null 2>&1; then
    TRADE_ID=$(echo "$RESPONSE" | jq -r '.id')
    echo "Trade {symbol} created with ID: $TRADE_ID"
{close}
    IMPORTED=$((IMPORTED + 1))
else
    echo "Failed to create trade {symbol}: $RESPONSE"
fi
"#,
        n = n,
        total = total,
        base = base,
        symbol = trade.symbol,
        entry_price = trade.entry_price,
        quantity = trade.quantity,
        entry_date = trade.entry_date,
        margin_amount = trade.margin_amount,
        notes = trade.notes,
        close = close,
    )
}

fn footer(kind: &str) -> String {
    format!(
        r#"
echo ""
echo "Import finished"
echo "Imported trades: $IMPORTED of $TOTAL"
echo "{} portfolio restored"
"#,
        kind
    )
}
