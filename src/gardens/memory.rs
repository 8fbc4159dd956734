//! In-memory garden stores for tests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::models::{Garden, NewGarden, NewUserPlant, UpdateGardenRequest, UserPlant};
use super::repository::{GardenStore, UserPlantStore};
use crate::common::repository::{RepoError, RepoResult};

#[derive(Default)]
pub struct MemoryGardens {
    pub rows: Mutex<Vec<Garden>>,
}

#[async_trait]
impl GardenStore for MemoryGardens {
    async fn find_all_by_user_id(&self, user_id: &str) -> RepoResult<Vec<Garden>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|g| g.user_id == user_id).cloned().collect())
    }

    async fn find_one_by_user_id(&self, user_id: &str, garden_id: &str) -> RepoResult<Garden> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|g| g.id == garden_id && g.user_id == user_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_by_id(&self, garden_id: &str) -> RepoResult<Garden> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|g| g.id == garden_id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn create(&self, data: &NewGarden) -> RepoResult<Garden> {
        let garden = Garden {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            name: data.name.clone(),
            location: data.location.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(garden.clone());
        Ok(garden)
    }

    async fn update(&self, garden_id: &str, data: &UpdateGardenRequest) -> RepoResult<Garden> {
        let mut rows = self.rows.lock().unwrap();
        let garden = rows
            .iter_mut()
            .find(|g| g.id == garden_id)
            .ok_or(RepoError::NotFound)?;
        if let Some(name) = &data.name {
            garden.name = name.clone();
        }
        if let Some(location) = &data.location {
            garden.location = Some(location.clone());
        }
        Ok(garden.clone())
    }

    async fn delete(&self, garden_id: &str) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|g| g.id != garden_id);
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryUserPlants {
    pub rows: Mutex<Vec<UserPlant>>,
}

#[async_trait]
impl UserPlantStore for MemoryUserPlants {
    async fn bulk_insert(&self, _garden_id: &str, rows: &[NewUserPlant]) -> RepoResult<Vec<UserPlant>> {
        let inserted: Vec<UserPlant> = rows
            .iter()
            .map(|row| UserPlant {
                id: row.id.clone(),
                garden_id: row.garden_id.clone(),
                plant_id: row.plant_id.clone(),
                planted_at: row.planted_at,
            })
            .collect();
        self.rows.lock().unwrap().extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn delete(&self, _owner_id: &str, ids: &[String]) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !ids.contains(&p.id));
        Ok(rows.len() < before)
    }
}
