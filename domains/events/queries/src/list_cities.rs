use city_registry::CityRegistry;
use events_responses::CityResponse;

/// The cacheable-city list for client-side display and selection.
#[derive(Clone, Default)]
pub struct ListCitiesQueryHandler;

impl ListCitiesQueryHandler {
    pub fn new() -> Self { Self }

    pub fn execute(&self) -> Vec<CityResponse> {
        CityRegistry::list_all()
            .iter()
            .map(|city| {
                CityResponse {
                    name: city.name.to_string(),
                    state: city.state_name.to_string(),
                    tier: city.tier,
                }
            })
            .collect()
    }
}
