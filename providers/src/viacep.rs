use crate::{AddressPayload, FetchError, null_as_empty};
use cepfetch_types::{AddressResult, Source};
use serde::Deserialize;
use serde_json::Value;

/// ViaCEP `/ws/{cep}/json` response body.
///
/// Unknown postal codes come back as HTTP 200 with `{"erro": true}` (older
/// deployments send the string `"true"`), so the marker has to be checked
/// after decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViaCepPayload {
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(rename = "localidade", deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(rename = "bairro", deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(rename = "uf", deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(rename = "logradouro", deserialize_with = "null_as_empty")]
    pub street: String,
    erro: Option<Value>,
}

impl ViaCepPayload {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

impl AddressPayload for ViaCepPayload {
    const SOURCE: Source = Source::ViaCep;

    fn into_address(self) -> Result<AddressResult, FetchError> {
        if self.is_not_found() {
            return Err(FetchError::NotFound);
        }
        Ok(AddressResult::builder(Self::SOURCE)
            .state(self.state)
            .city(self.city)
            .street(self.street)
            .zip_code(self.cep)
            .neighborhood(self.neighborhood)
            .build())
    }
}
