//! Tests for plants module
//!
//! Watering interval parsing, search fallback and external imports.

#[cfg(test)]
mod tests {
    use super::super::memory::{FakeSpecies, MemoryPlants};
    use super::super::models::{
        CreateCustomPlantRequest, ExternalImage, ExternalPlant, ExternalPlantDetail, PlantSearch,
        WateringBenchmark, WateringInterval,
    };
    use super::super::service::{parse_watering_interval, PlantError, PlantsService};
    use crate::services::ExternalApiError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn external(id: i64, name: &str) -> ExternalPlant {
        ExternalPlant {
            id,
            common_name: name.to_string(),
            scientific_name: vec![format!("{} sp.", name)],
            family: Some("Araceae".to_string()),
            cultivar: None,
            species_epithet: Some("deliciosa".to_string()),
            genus: Some("Monstera".to_string()),
            default_image: Some(ExternalImage {
                regular_url: Some(format!("https://img/{}.jpg", id)),
            }),
        }
    }

    fn details(id: i64, value: serde_json::Value) -> ExternalPlantDetail {
        ExternalPlantDetail {
            id,
            watering_general_benchmark: Some(WateringBenchmark {
                value: Some(value),
                unit: Some("days".to_string()),
            }),
            sunlight: vec!["part shade".to_string()],
        }
    }

    fn service(plants: Arc<MemoryPlants>, species: Arc<FakeSpecies>) -> PlantsService {
        PlantsService::new(plants, species)
    }

    #[test]
    fn test_parse_watering_interval() {
        assert_eq!(
            parse_watering_interval("\"7-10\""),
            Some(WateringInterval { min: 7, max: 10 })
        );
        assert_eq!(
            parse_watering_interval("5"),
            Some(WateringInterval { min: 5, max: 5 })
        );
        assert_eq!(
            parse_watering_interval("every 3 - 4 days"),
            Some(WateringInterval { min: 3, max: 4 })
        );
        assert_eq!(parse_watering_interval("no numbers"), None);
        assert_eq!(parse_watering_interval(""), None);
    }

    #[tokio::test]
    async fn test_search_prefers_local_catalogue() {
        let plants = Arc::new(MemoryPlants::default());
        let species = Arc::new(FakeSpecies {
            search_results: vec![external(1, "Monstera")],
            ..Default::default()
        });
        let svc = service(plants.clone(), species);

        match svc.search_for_plants("monstera").await.unwrap() {
            PlantSearch::External(found) => assert_eq!(found.len(), 1),
            other => panic!("expected external results, got {:?}", other),
        }

        let mut with_details = FakeSpecies {
            search_results: vec![external(1, "Monstera")],
            ..Default::default()
        };
        with_details.details.insert(1, details(1, json!("\"7-10\"")));
        let svc = service(plants, Arc::new(with_details));
        svc.save_plants(&[external(1, "Monstera")]).await.unwrap();

        match svc.search_for_plants("MONST").await.unwrap() {
            PlantSearch::Local(found) => assert_eq!(found[0].external_api_id, Some(1)),
            other => panic!("expected local results, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_plants_imports_new_species_once() {
        let plants = Arc::new(MemoryPlants::default());
        let mut species = FakeSpecies::default();
        species.details = HashMap::from([
            (1, details(1, json!("\"7-10\""))),
            (2, details(2, json!(4))),
            (3, details(3, json!("Average"))),
        ]);
        let species = Arc::new(species);
        let svc = service(plants.clone(), species.clone());

        let batch = [
            external(1, "Monstera"),
            external(2, "Pothos"),
            external(3, "Mystery"),
            external(1, "Monstera"),
        ];
        let ids = svc.save_plants(&batch).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(species.detail_calls(), 3);

        let stored = plants.rows.lock().unwrap().clone();
        let monstera = stored.iter().find(|p| p.external_api_id == Some(1)).unwrap();
        assert_eq!(monstera.watering_frequency_days, 7);
        assert_eq!(monstera.sunlight, Some(vec!["part shade".to_string()]));
        assert_eq!(monstera.default_image.as_deref(), Some("https://img/1.jpg"));
        assert!(!monstera.is_custom);

        let again = svc.save_plants(&batch[..2]).await.unwrap();
        assert!(again.is_empty());
        assert_eq!(species.detail_calls(), 3);
    }

    #[tokio::test]
    async fn test_save_plants_surfaces_external_failures() {
        let svc = service(
            Arc::new(MemoryPlants::default()),
            Arc::new(FakeSpecies::default()),
        );
        let err = svc.save_plants(&[external(9, "Ghost")]).await.unwrap_err();
        assert!(matches!(err, PlantError::External(ExternalApiError::Status(404))));

        let api: crate::common::ApiError = err.into();
        assert!(matches!(api, crate::common::ApiError::BadGateway(_)));
    }

    #[tokio::test]
    async fn test_custom_plant_falls_back_to_custom_frequency() {
        let plants = Arc::new(MemoryPlants::default());
        let svc = service(plants, Arc::new(FakeSpecies::default()));

        let plant = svc
            .create_custom_plant(CreateCustomPlantRequest {
                common_name: Some(" Window fern ".to_string()),
                custom_watering_frequency_days: Some(6),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(plant.is_custom);
        assert_eq!(plant.common_name, "Window fern");
        assert_eq!(plant.watering_frequency_days, 6);
        assert_eq!(plant.external_api_id, None);
        assert_eq!(svc.get_plant(&plant.id).await.unwrap(), plant);
    }

    #[test]
    fn test_search_results_are_tagged() {
        let value = serde_json::to_value(PlantSearch::External(vec![external(1, "Monstera")])).unwrap();
        assert_eq!(value["source"], "external");
        assert_eq!(value["data"][0]["id"], 1);
    }
}
