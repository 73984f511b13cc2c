// LeadDesk - store/directory.rs
//
// In-memory company and courier collections with the same CRUD + notify
// shape as the request store. Companies read in name order, couriers in
// full-name order. Deletes are hard: removing a company does not cascade
// to the couriers referencing it, and the dangling reference is resolved
// lookup-at-read through `company_for`.

use crate::core::model::{Company, Courier};
use crate::util::error::StoreError;
use chrono::Local;
use std::collections::HashSet;
use std::fmt;

/// Callback receiving the full company collection after each change.
pub type CompanySubscriber = Box<dyn FnMut(&[Company])>;

/// Callback receiving the full courier collection after each change.
pub type CourierSubscriber = Box<dyn FnMut(&[Courier])>;

/// Handle returned by the subscribe methods, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectorySubscription(u64);

/// Resolution of a courier's weak company reference, performed by a
/// linear scan at read time.
///
/// The `Missing` sentinel (rather than a bare `None`) keeps "never
/// assigned" and "assigned to a since-deleted company" distinguishable
/// in every caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompanyLink<'a> {
    /// The courier has no company reference.
    Unassigned,
    /// The referenced company exists.
    Found(&'a Company),
    /// The courier references a company id that no longer exists.
    Missing(&'a str),
}

/// Fields supplied when creating a company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Fields supplied when creating a courier.
#[derive(Debug, Clone, Default)]
pub struct NewCourier {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company_id: Option<String>,
}

/// Companies and couriers under one roof.
pub struct DirectoryStore {
    companies: Vec<Company>,
    couriers: Vec<Courier>,
    company_subscribers: Vec<(DirectorySubscription, CompanySubscriber)>,
    courier_subscribers: Vec<(DirectorySubscription, CourierSubscriber)>,
    next_subscription: u64,
    next_record: u64,
}

impl fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("companies", &self.companies.len())
            .field("couriers", &self.couriers.len())
            .finish()
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            companies: Vec::new(),
            couriers: Vec::new(),
            company_subscribers: Vec::new(),
            courier_subscribers: Vec::new(),
            next_subscription: 1,
            next_record: 1,
        }
    }

    /// Seed from existing collections (e.g. a loaded snapshot). Read
    /// order is re-established here; a repeated id within either
    /// collection is rejected with [`StoreError::DuplicateId`].
    pub fn from_collections(
        companies: Vec<Company>,
        couriers: Vec<Courier>,
    ) -> Result<Self, StoreError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for company in &companies {
            if !seen.insert(company.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    collection: "companies",
                    id: company.id.clone(),
                });
            }
        }
        seen.clear();
        for courier in &couriers {
            if !seen.insert(courier.id.as_str()) {
                return Err(StoreError::DuplicateId {
                    collection: "couriers",
                    id: courier.id.clone(),
                });
            }
        }

        let mut store = Self::new();
        store.companies = companies;
        store.couriers = couriers;
        store.sort_companies();
        store.sort_couriers();
        Ok(store)
    }

    // -------------------------------------------------------------------
    // Companies
    // -------------------------------------------------------------------

    /// The company collection, in name order.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Look up a company by id.
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// Create a company: assigns an id, stamps timestamps, marks active.
    /// Returns the assigned id.
    pub fn add_company(&mut self, new: NewCompany) -> String {
        let id = format!("co-{:06}", self.take_record_number());
        let now = Local::now();
        self.companies.push(Company {
            id: id.clone(),
            name: new.name,
            description: new.description,
            address: new.address,
            phone: new.phone,
            email: new.email,
            website: new.website,
            is_active: true,
            created_at: now,
            updated_at: Some(now),
        });
        self.sort_companies();
        tracing::debug!(id = %id, "Company created");
        self.notify_companies();
        id
    }

    /// Toggle a company's active flag and stamp `updated_at`.
    pub fn set_company_active(&mut self, id: &str, is_active: bool) -> Result<(), StoreError> {
        let company = self
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "companies",
                id: id.to_string(),
            })?;
        company.is_active = is_active;
        company.updated_at = Some(Local::now());
        self.notify_companies();
        Ok(())
    }

    /// Hard-delete a company. Couriers referencing it keep their
    /// (now dangling) `company_id`.
    pub fn remove_company(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .companies
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "companies",
                id: id.to_string(),
            })?;
        self.companies.remove(position);
        tracing::debug!(id = %id, "Company removed");
        self.notify_companies();
        Ok(())
    }

    /// Register a company change listener. Fires immediately with the
    /// current collection, then after every company mutation.
    pub fn subscribe_companies(&mut self, mut callback: CompanySubscriber) -> DirectorySubscription {
        let id = DirectorySubscription(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.companies);
        self.company_subscribers.push((id, callback));
        id
    }

    // -------------------------------------------------------------------
    // Couriers
    // -------------------------------------------------------------------

    /// The courier collection, in full-name order.
    pub fn couriers(&self) -> &[Courier] {
        &self.couriers
    }

    /// Look up a courier by id.
    pub fn courier(&self, id: &str) -> Option<&Courier> {
        self.couriers.iter().find(|c| c.id == id)
    }

    /// Create a courier. The company reference, if given, is stored as-is:
    /// it is a weak key, validated only at read time. Returns the
    /// assigned id.
    pub fn add_courier(&mut self, new: NewCourier) -> String {
        let id = format!("cr-{:06}", self.take_record_number());
        let now = Local::now();
        self.couriers.push(Courier {
            id: id.clone(),
            full_name: new.full_name,
            phone: new.phone,
            email: new.email,
            company_id: new.company_id,
            is_active: true,
            created_at: now,
            updated_at: Some(now),
        });
        self.sort_couriers();
        tracing::debug!(id = %id, "Courier created");
        self.notify_couriers();
        id
    }

    /// Re-assign (or clear) a courier's company reference.
    pub fn assign_courier(
        &mut self,
        id: &str,
        company_id: Option<String>,
    ) -> Result<(), StoreError> {
        let courier = self
            .couriers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "couriers",
                id: id.to_string(),
            })?;
        courier.company_id = company_id;
        courier.updated_at = Some(Local::now());
        self.notify_couriers();
        Ok(())
    }

    /// Hard-delete a courier.
    pub fn remove_courier(&mut self, id: &str) -> Result<(), StoreError> {
        let position = self
            .couriers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: "couriers",
                id: id.to_string(),
            })?;
        self.couriers.remove(position);
        tracing::debug!(id = %id, "Courier removed");
        self.notify_couriers();
        Ok(())
    }

    /// Register a courier change listener. Fires immediately with the
    /// current collection, then after every courier mutation.
    pub fn subscribe_couriers(&mut self, mut callback: CourierSubscriber) -> DirectorySubscription {
        let id = DirectorySubscription(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.couriers);
        self.courier_subscribers.push((id, callback));
        id
    }

    /// Remove a listener from either collection. Returns false if the id
    /// was already gone.
    pub fn unsubscribe(&mut self, id: DirectorySubscription) -> bool {
        let before = self.company_subscribers.len() + self.courier_subscribers.len();
        self.company_subscribers.retain(|(sub, _)| *sub != id);
        self.courier_subscribers.retain(|(sub, _)| *sub != id);
        self.company_subscribers.len() + self.courier_subscribers.len() < before
    }

    // -------------------------------------------------------------------
    // Weak-reference resolution
    // -------------------------------------------------------------------

    /// Resolve a courier's company reference at read time.
    pub fn company_for<'a>(&'a self, courier: &'a Courier) -> CompanyLink<'a> {
        match courier.company_id.as_deref() {
            None | Some("") => CompanyLink::Unassigned,
            Some(company_id) => match self.company(company_id) {
                Some(company) => CompanyLink::Found(company),
                None => CompanyLink::Missing(company_id),
            },
        }
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn sort_companies(&mut self) {
        self.companies.sort_by(|a, b| a.name.cmp(&b.name));
    }

    fn sort_couriers(&mut self) {
        self.couriers.sort_by(|a, b| a.full_name.cmp(&b.full_name));
    }

    fn notify_companies(&mut self) {
        for (_, callback) in &mut self.company_subscribers {
            callback(&self.companies);
        }
    }

    fn notify_couriers(&mut self) {
        for (_, callback) in &mut self.courier_subscribers {
            callback(&self.couriers);
        }
    }

    fn take_record_number(&mut self) -> u64 {
        let n = self.next_record;
        self.next_record += 1;
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn courier(name: &str, company_id: Option<&str>) -> NewCourier {
        NewCourier {
            full_name: name.to_string(),
            phone: "111".to_string(),
            email: None,
            company_id: company_id.map(String::from),
        }
    }

    #[test]
    fn test_companies_read_in_name_order() {
        let mut store = DirectoryStore::new();
        store.add_company(company("Zenith"));
        store.add_company(company("Apex"));
        store.add_company(company("Mercury"));
        let names: Vec<&str> = store.companies().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apex", "Mercury", "Zenith"]);
    }

    #[test]
    fn test_company_link_found() {
        let mut store = DirectoryStore::new();
        let company_id = store.add_company(company("Apex"));
        let courier_id = store.add_courier(courier("Ivanov", Some(&company_id)));

        let courier = store.courier(&courier_id).unwrap();
        match store.company_for(courier) {
            CompanyLink::Found(c) => assert_eq!(c.name, "Apex"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_company_link_missing_after_delete() {
        let mut store = DirectoryStore::new();
        let company_id = store.add_company(company("Apex"));
        let courier_id = store.add_courier(courier("Ivanov", Some(&company_id)));

        // Hard delete, no cascade: the courier keeps the dangling id.
        store.remove_company(&company_id).unwrap();
        let courier = store.courier(&courier_id).unwrap();
        assert_eq!(courier.company_id.as_deref(), Some(company_id.as_str()));
        assert_eq!(
            store.company_for(courier),
            CompanyLink::Missing(company_id.as_str())
        );
    }

    #[test]
    fn test_company_link_unassigned() {
        let mut store = DirectoryStore::new();
        let courier_id = store.add_courier(courier("Ivanov", None));
        let courier = store.courier(&courier_id).unwrap();
        assert_eq!(store.company_for(courier), CompanyLink::Unassigned);
    }

    #[test]
    fn test_subscriptions_are_per_collection() {
        let company_pushes = Rc::new(RefCell::new(0usize));
        let courier_pushes = Rc::new(RefCell::new(0usize));

        let mut store = DirectoryStore::new();
        let cp = Rc::clone(&company_pushes);
        store.subscribe_companies(Box::new(move |_| *cp.borrow_mut() += 1));
        let kp = Rc::clone(&courier_pushes);
        store.subscribe_couriers(Box::new(move |_| *kp.borrow_mut() += 1));

        store.add_company(company("Apex"));
        store.add_courier(courier("Ivanov", None));

        // Each listener: initial push + its own collection's mutation.
        assert_eq!(*company_pushes.borrow(), 2);
        assert_eq!(*courier_pushes.borrow(), 2);
    }

    #[test]
    fn test_seed_with_duplicate_courier_ids_rejected() {
        let mut store = DirectoryStore::new();
        store.add_company(company("Apex"));
        store.add_courier(courier("Ivanov", None));
        let companies = store.companies().to_vec();
        let mut couriers = store.couriers().to_vec();
        couriers.push(couriers[0].clone());

        let result = DirectoryStore::from_collections(companies, couriers);
        assert!(matches!(
            result,
            Err(StoreError::DuplicateId { collection: "couriers", .. })
        ));
    }

    #[test]
    fn test_set_company_active_stamps() {
        let mut store = DirectoryStore::new();
        let id = store.add_company(company("Apex"));
        store.set_company_active(&id, false).unwrap();
        let c = store.company(&id).unwrap();
        assert!(!c.is_active);
        assert!(c.updated_at.unwrap() >= c.created_at);
    }
}
