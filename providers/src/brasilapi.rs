use crate::{AddressPayload, FetchError, null_as_empty};
use cepfetch_types::{AddressResult, Source};
use serde::Deserialize;

/// BrasilAPI `/api/cep/v1/{cep}` response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrasilApiPayload {
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub street: String,
}

impl AddressPayload for BrasilApiPayload {
    const SOURCE: Source = Source::BrasilApi;

    fn into_address(self) -> Result<AddressResult, FetchError> {
        Ok(AddressResult::builder(Self::SOURCE)
            .state(self.state)
            .city(self.city)
            .street(self.street)
            .zip_code(self.cep)
            .neighborhood(self.neighborhood)
            .build())
    }
}
