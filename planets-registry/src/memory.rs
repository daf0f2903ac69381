//! In-memory planet repository.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process deployments.

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use planets_core::error::{PlanetsError, Result};
use planets_core::traits::PlanetRepository;
use planets_core::types::{Direction, NewPlanet, PageRequest, Planet, Sort, SortKey};

/// In-memory planet repository.
///
/// # Indexing
///
/// Planets are indexed by:
/// - ID: primary storage
/// - Name: uniqueness check and name lookups
///
/// # Thread Safety
///
/// All operations are thread-safe. Name uniqueness holds under concurrent
/// saves: the name slot is claimed through the map's entry lock.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    /// Primary storage: ID → Planet
    planets: DashMap<Uuid, Planet>,
    /// Name index: exact name → ID
    name_index: DashMap<String, Uuid>,
}

impl MemoryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of planets.
    pub fn len(&self) -> usize {
        self.planets.len()
    }

    /// Returns true if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Removes every planet.
    pub fn clear(&self) {
        self.planets.clear();
        self.name_index.clear();
    }

    /// Returns all planets in no particular order (for export/backup).
    pub fn all_planets(&self) -> Vec<Planet> {
        self.planets
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

fn compare(a: &Planet, b: &Planet, sort: Sort) -> Ordering {
    let by_key = match sort.key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Terrain => a.terrain.cmp(&b.terrain),
        SortKey::Climate => a.climate.cmp(&b.climate),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    // Ties fall back to id so page windows stay stable.
    let ordering = by_key.then_with(|| a.id.cmp(&b.id));
    match sort.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl PlanetRepository for MemoryRepository {
    #[instrument(skip(self, planet), fields(name = %planet.name))]
    async fn save(&self, planet: NewPlanet) -> Result<Planet> {
        planet.validate()?;

        let planet = Planet::from_new(planet);
        match self.name_index.entry(planet.name.clone()) {
            Entry::Occupied(_) => Err(PlanetsError::Conflict(format!(
                "planet '{}' already exists",
                planet.name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(planet.id);
                self.planets.insert(planet.id, planet.clone());
                debug!(id = %planet.id, "Saved planet");
                Ok(planet)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        match self.planets.remove(&id) {
            Some((_, planet)) => {
                self.name_index.remove(&planet.name);
                debug!(name = %planet.name, "Deleted planet");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool> {
        Ok(self.planets.contains_key(&id))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Planet>> {
        Ok(self.planets.get(&id).map(|entry| entry.clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let id = match self.name_index.get(name) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.planets.get(&id).map(|entry| entry.clone()))
    }

    #[instrument(skip(self), fields(page = request.page_number, size = request.page_size))]
    async fn find_all_paged(&self, request: &PageRequest) -> Result<(Vec<Planet>, u64)> {
        let mut planets = self.all_planets();
        let total = planets.len() as u64;

        planets.sort_by(|a, b| compare(a, b, request.sort));

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content: Vec<Planet> = planets
            .into_iter()
            .skip(offset)
            .take(request.page_size as usize)
            .collect();

        debug!(total, returned = content.len(), "Paged planets");
        Ok((content, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planets_core::types::PaginatedResult;

    fn planet(name: &str) -> NewPlanet {
        NewPlanet::new(name, "mountains", "temperate")
    }

    async fn seeded(names: &[&str]) -> MemoryRepository {
        let repository = MemoryRepository::new();
        for name in names {
            repository.save(planet(name)).await.unwrap();
        }
        repository
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repository = MemoryRepository::new();

        let saved = repository.save(planet("Alderaan")).await.unwrap();

        assert!(repository.exists_by_id(saved.id).await.unwrap());
        assert_eq!(repository.find_by_id(saved.id).await.unwrap(), Some(saved.clone()));
        assert_eq!(repository.find_by_name("Alderaan").await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_find_by_name_is_exact() {
        let repository = seeded(&["Alderaan"]).await;

        assert!(repository.find_by_name("alderaan").await.unwrap().is_none());
        assert!(repository.find_by_name("Alderaan ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repository = seeded(&["Hoth"]).await;

        let result = repository.save(NewPlanet::new("Hoth", "ice", "frozen")).await;

        assert!(matches!(result, Err(PlanetsError::Conflict(_))));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_planet_rejected() {
        let repository = MemoryRepository::new();

        let result = repository.save(NewPlanet::new("Hoth", "", "frozen")).await;

        assert!(matches!(result, Err(PlanetsError::ValidationError(_))));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repository = MemoryRepository::new();
        let saved = repository.save(planet("Dagobah")).await.unwrap();

        assert!(repository.delete_by_id(saved.id).await.unwrap());
        assert!(!repository.delete_by_id(saved.id).await.unwrap());
        assert!(!repository.exists_by_id(saved.id).await.unwrap());
        assert!(repository.find_by_name("Dagobah").await.unwrap().is_none());

        // The name is free again.
        repository.save(planet("Dagobah")).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let repository = MemoryRepository::new();
        assert!(repository.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(!repository.exists_by_id(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_paging_by_name() {
        let repository = seeded(&["Endor", "Alderaan", "Coruscant", "Bespin", "Dagobah"]).await;
        let request = PageRequest::parse(0, 2, "name").unwrap();

        let (content, total) = repository.find_all_paged(&request).await.unwrap();
        let page = PaginatedResult::new(content, total, &request);

        let names: Vec<&str> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alderaan", "Bespin"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.is_first);
        assert!(!page.is_last);
    }

    #[tokio::test]
    async fn test_last_partial_page() {
        let repository = seeded(&["Endor", "Alderaan", "Coruscant", "Bespin", "Dagobah"]).await;
        let request = PageRequest::parse(2, 2, "name").unwrap();

        let (content, total) = repository.find_all_paged(&request).await.unwrap();

        assert_eq!(total, 5);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].name, "Endor");
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let repository = seeded(&["Alderaan", "Bespin"]).await;
        let request = PageRequest::parse(5, 10, "name").unwrap();

        let (content, total) = repository.find_all_paged(&request).await.unwrap();

        assert!(content.is_empty());
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_descending_sort() {
        let repository = seeded(&["Alderaan", "Bespin", "Coruscant"]).await;
        let request = PageRequest::parse(0, 10, "name,desc").unwrap();

        let (content, _) = repository.find_all_paged(&request).await.unwrap();

        let names: Vec<&str> = content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Coruscant", "Bespin", "Alderaan"]);
    }

    #[tokio::test]
    async fn test_ties_ordered_by_id() {
        let repository = seeded(&["Alderaan", "Bespin", "Coruscant"]).await;
        let request = PageRequest::parse(0, 10, "terrain").unwrap();

        let (content, _) = repository.find_all_paged(&request).await.unwrap();

        let mut ids: Vec<Uuid> = content.iter().map(|p| p.id).collect();
        let returned = ids.clone();
        ids.sort();
        assert_eq!(returned, ids);
    }

    #[tokio::test]
    async fn test_clear() {
        let repository = seeded(&["Alderaan", "Bespin"]).await;

        repository.clear();

        assert!(repository.is_empty());
        assert!(repository.find_by_name("Alderaan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_saves_keep_names_unique() {
        use std::sync::Arc;
        use tokio::task::JoinSet;

        let repository = Arc::new(MemoryRepository::new());
        let mut tasks = JoinSet::new();

        // 100 tasks racing over 10 distinct names
        for i in 0..100u32 {
            let repo = repository.clone();
            tasks.spawn(async move { repo.save(planet(&format!("Planet-{}", i % 10))).await });
        }

        let mut conflicts = 0;
        while let Some(result) = tasks.join_next().await {
            if let Err(PlanetsError::Conflict(_)) = result.unwrap() {
                conflicts += 1;
            }
        }

        assert_eq!(repository.len(), 10);
        assert_eq!(conflicts, 90);
    }

    #[tokio::test]
    async fn test_timestamps_assigned() {
        let before = chrono::Utc::now();
        let repository = MemoryRepository::new();

        let saved = repository.save(planet("Naboo")).await.unwrap();

        assert!(saved.created_at >= before);
        assert_eq!(saved.created_at, saved.updated_at);
    }
}
