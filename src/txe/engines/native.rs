use super::on_chain::{OnChainAsset, OnChainEngine};

use crate::money::CryptoCurrency;

/// Coins that pay their own network fees: Bitcoin, Bitcoin Cash and Ether
pub struct NativeCoin;

impl OnChainAsset for NativeCoin {
    const NAME: &'static str = "native coin";

    const ALLOWS_CUSTOM_FEE: bool = true;

    fn supports(asset: &CryptoCurrency) -> bool {
        return !asset.is_erc20();
    }
}

pub type NativeCoinEngine = OnChainEngine<NativeCoin>;
