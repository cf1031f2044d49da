use restson::blocking::RestClient;
use restson::{Error, RestClient as AsyncRestClient, RestPath};
use serde_derive::Deserialize;

use crate::{Ephemerides, EphemerisQuery, HorizonsError};

pub const DEFAULT_URL: &str = "https://ssd.jpl.nasa.gov";

#[derive(Deserialize, Debug)]
pub struct Signature {
    pub source: String,
    pub version: String,
}

/// JSON envelope around the plain-text Horizons result.
#[derive(Deserialize, Debug)]
pub struct ApiResponse {
    pub signature: Option<Signature>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl RestPath<()> for ApiResponse {
    fn get_path(_: ()) -> Result<String, Error> {
        Ok(String::from("/api/horizons.api"))
    }
}

pub struct Client {
    client: RestClient,
}

impl Client {
    pub fn new(url: &str) -> Result<Self, HorizonsError> {
        let client = AsyncRestClient::new_blocking(url)?;
        Ok(Client { client })
    }

    /// Runs one observer-table query. The call blocks until Horizons answers.
    pub fn ephemerides(&mut self, query: &EphemerisQuery) -> Result<Ephemerides, HorizonsError> {
        let params: Vec<_> = query.into();
        let response = self
            .client
            .get_with::<_, ApiResponse>((), &params)?
            .into_inner();

        response.into_ephemerides()
    }
}

impl ApiResponse {
    fn into_ephemerides(self) -> Result<Ephemerides, HorizonsError> {
        if let Some(error) = self.error {
            return Err(HorizonsError::Api(error.trim().to_string()));
        }

        if let Some(signature) = &self.signature {
            log::trace!("Horizons answered ({} {})", signature.source, signature.version);
        }

        let result = self.result.ok_or(HorizonsError::EmptyResult)?;
        Ephemerides::parse(&result)
    }
}
