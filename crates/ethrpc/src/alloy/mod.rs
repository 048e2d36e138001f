pub mod errors;
mod instrumentation;
pub mod wallet;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock;
use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::{ClientBuilder, RpcClient},
    },
    instrumentation::{InstrumentationLayer, LabelingLayer},
    url::Url,
};

fn client(url: &Url, label: &str) -> RpcClient {
    ClientBuilder::default()
        .layer(LabelingLayer {
            label: label.into(),
        })
        .layer(InstrumentationLayer)
        .http(url.clone())
}

/// Provider that fills and signs transactions with the given wallet before
/// sending them to the node at `url`. Requests are traced with `label`.
pub fn provider_with_wallet(url: &Url, label: &str, wallet: EthereumWallet) -> AlloyProvider {
    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(client(url, label))
        .erased()
}

/// Provider backed by a mocked transport. Responses have to be queued on the
/// returned [`mock::Asserter`] in the order the requests are issued.
#[cfg(any(test, feature = "test-util"))]
pub fn mocked_provider() -> (AlloyProvider, mock::Asserter) {
    let asserter = mock::Asserter::new();
    let provider = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    (provider, asserter)
}
