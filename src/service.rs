//! Rental operations over a [`CarRepository`].
//!
//! Every mutating call flushes before it returns, so a successful rent or
//! return is durable.
//!
//! ```
//! use fleetstore::{CarRecord, CarRepository, Condition, MemoryBackend, RentalService};
//!
//! let repo = CarRepository::open(MemoryBackend::new())?;
//! let mut service = RentalService::new(repo);
//! service.add_car(CarRecord::new("c1", "Atlas", Condition::Good, 1800.0))?;
//!
//! let due = service.rent_car("c1", "42")?;
//! assert_eq!(due, 1800.0);
//! assert_eq!(service.find("c1").unwrap().status, "Rented by user 42");
//! assert!(service.list_available(10).is_empty());
//!
//! service.return_car("c1")?;
//! assert_eq!(service.list_available(10).len(), 1);
//! # Ok::<(), fleetstore::StoreError>(())
//! ```

use crate::backend::StorageBackend;
use crate::codec::serialize_record;
use crate::error::{Result, StoreError};
use crate::record::CarRecord;
use crate::repository::CarRepository;
use tracing::info;

pub struct RentalService<B = Box<dyn StorageBackend>> {
    repository: CarRepository<B>,
}

impl<B: StorageBackend> RentalService<B> {
    pub fn new(repository: CarRepository<B>) -> Self {
        Self { repository }
    }

    /// Register a new car.
    ///
    /// # Errors
    /// - [`StoreError::DuplicateId`] if the id is taken.
    /// - [`StoreError::ValidationFailed`] if the record is invalid.
    /// - Any flush error.
    pub fn add_car(&mut self, record: CarRecord) -> Result<()> {
        if self.repository.contains(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        serialize_record(&record)?;
        info!(id = %record.id, model = %record.model, "car added");
        self.repository.upsert(record);
        self.repository.flush()
    }

    /// Up to `limit` available cars, ascending by id.
    #[must_use]
    pub fn list_available(&self, limit: usize) -> Vec<CarRecord> {
        let mut cars = self.repository.available();
        cars.truncate(limit);
        cars
    }

    #[must_use]
    pub fn find(&self, car_id: &str) -> Option<&CarRecord> {
        self.repository.find(car_id)
    }

    /// Rent `car_id` to `user_id` and return the amount due for one day.
    ///
    /// # Errors
    /// - [`StoreError::UnknownCar`] if no such car exists.
    /// - [`StoreError::NotAvailable`] if it is already rented.
    /// - Any flush error.
    pub fn rent_car(&mut self, car_id: &str, user_id: &str) -> Result<f64> {
        let car = self
            .repository
            .find(car_id)
            .ok_or_else(|| StoreError::UnknownCar(car_id.to_string()))?;
        if !car.is_available() {
            return Err(StoreError::NotAvailable {
                id: car.id.clone(),
                status: car.status.clone(),
            });
        }
        let due = car.price_per_day;

        self.repository.update(car_id, |car| car.mark_rented(user_id));
        self.repository.flush()?;
        info!(id = car_id, user = user_id, due, "car rented");
        Ok(due)
    }

    /// Mark `car_id` available again.
    ///
    /// Returning a car that is not rented is allowed and leaves it available.
    ///
    /// # Errors
    /// [`StoreError::UnknownCar`] if no such car exists, or any flush error.
    pub fn return_car(&mut self, car_id: &str) -> Result<()> {
        if !self.repository.update(car_id, CarRecord::mark_available) {
            return Err(StoreError::UnknownCar(car_id.to_string()));
        }
        self.repository.flush()?;
        info!(id = car_id, "car returned");
        Ok(())
    }

    /// Upsert `records` and flush once.
    ///
    /// # Errors
    /// Any flush error.
    pub fn ingest<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = CarRecord>,
    {
        self.repository.bulk_upsert(records);
        self.repository.flush()
    }

    /// Flush pending changes, if any.
    ///
    /// # Errors
    /// Any flush error.
    pub fn save(&mut self) -> Result<()> {
        self.repository.flush()
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.repository.total_records()
    }

    #[must_use]
    pub fn repository(&self) -> &CarRepository<B> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut CarRepository<B> {
        &mut self.repository
    }

    pub fn into_repository(self) -> CarRepository<B> {
        self.repository
    }
}
