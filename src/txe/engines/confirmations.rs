use super::EngineBinding;

use crate::context::EngineContext;
use crate::models::{PendingTransaction, TransactionConfirmation};
use crate::Result;

/// Rebuilds the whole confirmation list from the pending transaction and current prices
pub(super) async fn build_confirmations(
    context: &EngineContext,
    binding: &EngineBinding,
    pending: PendingTransaction,
) -> Result<PendingTransaction> {
    let fiat = pending.selected_fiat_currency;
    let asset = &binding.source.asset;
    let fee_asset = &pending.fee_selection.asset;
    let prices = &context.services.prices;

    let asset_price = context.read("price", || prices.price(asset, fiat)).await?;

    let fee_price = if fee_asset == asset {
        asset_price.clone()
    } else {
        context.read("price", || prices.price(fee_asset, fiat)).await?
    };

    let amount_fiat = asset_price.convert(&pending.amount)?;
    let fee_fiat = fee_price.convert(&pending.fee_amount)?;

    // a crypto total only makes sense when both legs are in the same asset
    let total = match fee_asset == asset {
        true => Some(pending.amount.add(&pending.fee_amount)?),
        false => None,
    };

    let mut confirmations = vec![
        TransactionConfirmation::Source {
            label: binding.source.label.clone(),
        },
        TransactionConfirmation::Destination {
            label: binding.target.label(),
        },
    ];

    if pending.fee_selection.has_choice() {
        confirmations.push(TransactionConfirmation::FeeSelection(
            pending.fee_selection.clone(),
        ));
    }

    confirmations.push(TransactionConfirmation::NetworkFee {
        fee: pending.fee_amount.clone(),
        fiat: fee_fiat.clone(),
    });

    confirmations.push(TransactionConfirmation::Amount {
        amount: pending.amount.clone(),
        fiat: amount_fiat.clone(),
    });

    confirmations.push(TransactionConfirmation::Total {
        total,
        fiat: amount_fiat.add(&fee_fiat)?,
    });

    return Ok(pending.with_confirmations(confirmations));
}
