//! Billing classifier
//!
//! Orchestrates the three lookups in fixed priority order: guarantee
//! coverage, then SLA contract coverage, then fee schedule pricing. The
//! first applicable rule wins; the fee schedule path always produces a
//! result, so classification never fails for lack of a matching rule.

use async_trait::async_trait;
use fibreflow_core::{
    config::BillingConfig,
    models::{BillingClassification, BillingRequest, Guarantee, ServiceContract},
    traits::{
        CacheService, ClassificationService, ContractRepository, FeeScheduleRepository,
        GuaranteeRepository, SlaConfigRepository,
    },
    AppError, AppResult,
};
use fibreflow_cache::keys;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::constants;
use crate::fee_resolver;

/// Billing classification engine
///
/// Stateless apart from its injected capabilities; safe to share behind an
/// Arc and call from concurrent requests. All lookups are read-only.
pub struct BillingClassifier<G, C, S, F, Ca> {
    guarantee_repo: Arc<G>,
    contract_repo: Arc<C>,
    sla_repo: Arc<S>,
    fee_repo: Arc<F>,
    cache: Arc<Ca>,
    default_callout_fee: Decimal,
    approval_threshold: Decimal,
    sla_proration_days: i32,
    lookup_cache_ttl: u64,
}

impl<G, C, S, F, Ca> BillingClassifier<G, C, S, F, Ca>
where
    G: GuaranteeRepository,
    C: ContractRepository,
    S: SlaConfigRepository,
    F: FeeScheduleRepository,
    Ca: CacheService,
{
    /// Create a classifier with the default billing constants
    pub fn new(
        guarantee_repo: Arc<G>,
        contract_repo: Arc<C>,
        sla_repo: Arc<S>,
        fee_repo: Arc<F>,
        cache: Arc<Ca>,
    ) -> Self {
        Self {
            guarantee_repo,
            contract_repo,
            sla_repo,
            fee_repo,
            cache,
            default_callout_fee: constants::DEFAULT_CALLOUT_FEE,
            approval_threshold: constants::APPROVAL_THRESHOLD,
            sla_proration_days: constants::SLA_PRORATION_DAYS,
            lookup_cache_ttl: constants::LOOKUP_CACHE_TTL,
        }
    }

    /// Create a classifier configured from application settings
    pub fn with_config(
        guarantee_repo: Arc<G>,
        contract_repo: Arc<C>,
        sla_repo: Arc<S>,
        fee_repo: Arc<F>,
        cache: Arc<Ca>,
        config: &BillingConfig,
    ) -> Self {
        let mut classifier = Self::new(guarantee_repo, contract_repo, sla_repo, fee_repo, cache);
        classifier.default_callout_fee =
            Decimal::try_from(config.default_callout_fee).unwrap_or(constants::DEFAULT_CALLOUT_FEE);
        classifier.approval_threshold =
            Decimal::try_from(config.approval_threshold).unwrap_or(constants::APPROVAL_THRESHOLD);
        classifier.sla_proration_days = config.sla_proration_days;
        classifier.lookup_cache_ttl = config.lookup_cache_ttl_secs;
        classifier
    }

    /// Reject malformed requests before any lookup runs
    fn validate(request: &BillingRequest) -> AppResult<()> {
        if request.project_id.is_nil() {
            return Err(AppError::MissingField("project_id".to_string()));
        }

        if let Some(ref dr) = request.dr_number {
            if dr.trim().is_empty() {
                return Err(AppError::InvalidInput(
                    "dr_number must not be blank".to_string(),
                ));
            }
        }

        if let Some(ref st) = request.service_type {
            if st.trim().is_empty() {
                return Err(AppError::InvalidInput(
                    "service_type must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Look up the in-force guarantee for a project, via cache
    async fn active_guarantee(&self, project_id: Uuid) -> AppResult<Option<Guarantee>> {
        let key = keys::active_guarantee(project_id);

        match self.cache.get::<Guarantee>(&key).await {
            // A cached guarantee can pass its expiry or limit inside the TTL
            // window, so the in-force check is repeated on the hit.
            Ok(Some(g)) if g.is_in_force() => {
                debug!("Guarantee cache HIT for project {}", project_id);
                return Ok(Some(g));
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Cache error for project {}: {}", project_id, e);
                // Don't fail on cache errors, just continue without cache
            }
        }

        let guarantee = self.guarantee_repo.find_active_for_project(project_id).await?;

        if let Some(ref g) = guarantee {
            if let Err(e) = self.cache.set(&key, g, self.lookup_cache_ttl).await {
                warn!("Failed to cache guarantee for project {}: {}", project_id, e);
            }
        }

        Ok(guarantee)
    }

    /// Look up the active contract for a project, via cache
    async fn active_contract(&self, project_id: Uuid) -> AppResult<Option<ServiceContract>> {
        let key = keys::active_contract(project_id);

        match self.cache.get::<ServiceContract>(&key).await {
            Ok(Some(c)) if c.is_in_force() => {
                debug!("Contract cache HIT for project {}", project_id);
                return Ok(Some(c));
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Cache error for project {}: {}", project_id, e);
            }
        }

        let contract = self.contract_repo.find_active_for_project(project_id).await?;

        if let Some(ref c) = contract {
            if let Err(e) = self.cache.set(&key, c, self.lookup_cache_ttl).await {
                warn!("Failed to cache contract for project {}: {}", project_id, e);
            }
        }

        Ok(contract)
    }

    /// Check guarantee coverage (priority 1)
    async fn check_guarantee(
        &self,
        request: &BillingRequest,
    ) -> AppResult<Option<BillingClassification>> {
        let Some(guarantee) = self.active_guarantee(request.project_id).await? else {
            return Ok(None);
        };

        if let Some(ref dr) = request.dr_number {
            if guarantee.covers_drop(dr) {
                debug!("Drop {} covered by guarantee {}", dr, guarantee.id);
                return Ok(Some(BillingClassification::guarantee(
                    guarantee.id,
                    format!("Drop {} covered by project guarantee", dr),
                )));
            }
        }

        if let Some(ref st) = request.service_type {
            if guarantee.covers_service_type(st) {
                debug!("Service type {} covered by guarantee {}", st, guarantee.id);
                return Ok(Some(BillingClassification::guarantee(
                    guarantee.id,
                    format!("Service type {} covered by project guarantee", st),
                )));
            }
        }

        Ok(None)
    }

    /// Check SLA contract coverage (priority 2)
    async fn check_sla(
        &self,
        request: &BillingRequest,
    ) -> AppResult<Option<BillingClassification>> {
        let Some(sla_config_id) = request.sla_config_id else {
            return Ok(None);
        };

        let Some(contract) = self.active_contract(request.project_id).await? else {
            return Ok(None);
        };

        // An sla_config_id that doesn't resolve falls through to the fee
        // schedule rather than erroring; the reference may be stale.
        let Some(sla) = self.sla_repo.find_by_id(sla_config_id).await? else {
            debug!("SLA config {} did not resolve", sla_config_id);
            return Ok(None);
        };

        let estimated_cost = contract.daily_equivalent_fee(self.sla_proration_days);

        debug!(
            "Contract {} covers ticket under SLA {} at {}",
            contract.id, sla.name, estimated_cost
        );

        Ok(Some(BillingClassification::sla(
            contract.id,
            estimated_cost,
            format!("Covered by service contract under SLA {}", sla.name),
        )))
    }

    /// Price from the fee schedule (priority 3, always applicable)
    async fn price_billable(&self, request: &BillingRequest) -> AppResult<BillingClassification> {
        let candidates = self
            .fee_repo
            .find_matching(
                request.project_id,
                request.ticket_type,
                request.priority,
                request.service_type.as_deref(),
            )
            .await?;

        let best = fee_resolver::resolve_best_entry(candidates);
        let estimate =
            fee_resolver::estimate_fee(best.as_ref(), self.default_callout_fee, self.approval_threshold);

        let reason = match best {
            Some(_) => "Billable per fee schedule".to_string(),
            None => "No fee schedule entry matched; default callout fee applied".to_string(),
        };

        Ok(BillingClassification::billable(
            estimate.entry_id,
            estimate.cost,
            estimate.requires_approval,
            reason,
        ))
    }
}

#[async_trait]
impl<G, C, S, F, Ca> ClassificationService for BillingClassifier<G, C, S, F, Ca>
where
    G: GuaranteeRepository,
    C: ContractRepository,
    S: SlaConfigRepository,
    F: FeeScheduleRepository,
    Ca: CacheService,
{
    #[instrument(skip(self, request), fields(project_id = %request.project_id))]
    async fn classify(&self, request: &BillingRequest) -> AppResult<BillingClassification> {
        Self::validate(request)?;

        debug!(
            "Classifying ticket billing: type={} priority={} dr={:?}",
            request.ticket_type, request.priority, request.dr_number
        );

        if let Some(result) = self.check_guarantee(request).await? {
            return Ok(result);
        }

        if let Some(result) = self.check_sla(request).await? {
            return Ok(result);
        }

        self.price_billable(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fibreflow_core::models::{
        BillingType, FeeScheduleEntry, SlaConfig, TicketPriority, TicketType,
    };
    use fibreflow_core::traits::Repository;
    use rust_decimal_macros::dec;
    use serde::{de::DeserializeOwned, Serialize};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory cache fake
    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CacheService for MemoryCache {
        async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
            let entries = self.entries.lock().unwrap();
            match entries.get(key) {
                Some(json) => Ok(Some(serde_json::from_str(json)?)),
                None => Ok(None),
            }
        }

        async fn set<T: Serialize + Send + Sync>(
            &self,
            key: &str,
            value: &T,
            _ttl_secs: u64,
        ) -> AppResult<()> {
            let json = serde_json::to_string(value)?;
            self.entries.lock().unwrap().insert(key.to_string(), json);
            Ok(())
        }

        async fn delete(&self, key: &str) -> AppResult<bool> {
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        async fn exists(&self, key: &str) -> AppResult<bool> {
            Ok(self.entries.lock().unwrap().contains_key(key))
        }

        async fn expire(&self, _key: &str, _ttl_secs: u64) -> AppResult<bool> {
            Ok(true)
        }
    }

    macro_rules! stub_repository {
        ($name:ident, $entity:ty) => {
            #[derive(Default)]
            struct $name {
                items: Vec<$entity>,
            }

            #[async_trait]
            impl Repository<$entity, Uuid> for $name {
                async fn find_by_id(&self, id: Uuid) -> AppResult<Option<$entity>> {
                    Ok(self.items.iter().find(|i| i.id == id).cloned())
                }

                async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<$entity>> {
                    Ok(self.items.clone())
                }

                async fn count(&self) -> AppResult<i64> {
                    Ok(self.items.len() as i64)
                }

                async fn create(&self, entity: &$entity) -> AppResult<$entity> {
                    Ok(entity.clone())
                }

                async fn update(&self, entity: &$entity) -> AppResult<$entity> {
                    Ok(entity.clone())
                }

                async fn delete(&self, _id: Uuid) -> AppResult<bool> {
                    Ok(false)
                }
            }
        };
    }

    stub_repository!(StubGuaranteeRepo, Guarantee);
    stub_repository!(StubContractRepo, ServiceContract);
    stub_repository!(StubSlaRepo, SlaConfig);
    stub_repository!(StubFeeRepo, FeeScheduleEntry);

    #[async_trait]
    impl GuaranteeRepository for StubGuaranteeRepo {
        async fn find_active_for_project(&self, project_id: Uuid) -> AppResult<Option<Guarantee>> {
            Ok(self
                .items
                .iter()
                .find(|g| g.project_id == project_id && g.is_in_force())
                .cloned())
        }
    }

    #[async_trait]
    impl ContractRepository for StubContractRepo {
        async fn find_active_for_project(
            &self,
            project_id: Uuid,
        ) -> AppResult<Option<ServiceContract>> {
            Ok(self
                .items
                .iter()
                .find(|c| c.project_id == project_id && c.is_in_force())
                .cloned())
        }
    }

    #[async_trait]
    impl SlaConfigRepository for StubSlaRepo {}

    #[async_trait]
    impl FeeScheduleRepository for StubFeeRepo {
        async fn find_matching(
            &self,
            project_id: Uuid,
            ticket_type: TicketType,
            priority: TicketPriority,
            service_type: Option<&str>,
        ) -> AppResult<Vec<FeeScheduleEntry>> {
            Ok(self
                .items
                .iter()
                .filter(|e| e.matches(project_id, ticket_type, priority, service_type))
                .cloned()
                .collect())
        }
    }

    fn classifier(
        guarantees: Vec<Guarantee>,
        contracts: Vec<ServiceContract>,
        slas: Vec<SlaConfig>,
        fees: Vec<FeeScheduleEntry>,
    ) -> BillingClassifier<StubGuaranteeRepo, StubContractRepo, StubSlaRepo, StubFeeRepo, MemoryCache>
    {
        BillingClassifier::new(
            Arc::new(StubGuaranteeRepo { items: guarantees }),
            Arc::new(StubContractRepo { items: contracts }),
            Arc::new(StubSlaRepo { items: slas }),
            Arc::new(StubFeeRepo { items: fees }),
            Arc::new(MemoryCache::default()),
        )
    }

    fn request(project_id: Uuid) -> BillingRequest {
        BillingRequest {
            project_id,
            ticket_type: TicketType::Repair,
            priority: TicketPriority::Medium,
            dr_number: None,
            service_type: None,
            sla_config_id: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_nil_project_id() {
        let c = classifier(vec![], vec![], vec![], vec![]);
        let err = c.classify(&request(Uuid::nil())).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));
    }

    #[tokio::test]
    async fn test_rejects_blank_dr_number() {
        let c = classifier(vec![], vec![], vec![], vec![]);
        let mut req = request(Uuid::new_v4());
        req.dr_number = Some("   ".to_string());
        let err = c.classify(&req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_no_rules_falls_back_to_default_fee() {
        let c = classifier(vec![], vec![], vec![], vec![]);
        let result = c.classify(&request(Uuid::new_v4())).await.unwrap();

        assert_eq!(result.billing_type, BillingType::Billable);
        assert_eq!(result.estimated_cost, Some(dec!(500)));
        assert!(result.requires_approval);
        assert!(result.source.is_none());
    }

    #[tokio::test]
    async fn test_guarantee_lookup_is_cached() {
        let project_id = Uuid::new_v4();
        let guarantee = Guarantee {
            id: Uuid::new_v4(),
            project_id,
            active: true,
            expires_at: None,
            incident_limit: None,
            incident_count: 0,
            dr_numbers: Some(vec!["DR100".to_string()]),
            service_types: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let c = classifier(vec![guarantee], vec![], vec![], vec![]);
        let mut req = request(project_id);
        req.dr_number = Some("DR100".to_string());

        let first = c.classify(&req).await.unwrap();
        assert_eq!(first.billing_type, BillingType::Guarantee);

        // Second call is served from the cache and must agree
        let second = c.classify(&req).await.unwrap();
        assert_eq!(first, second);
        assert!(c
            .cache
            .exists(&keys::active_guarantee(project_id))
            .await
            .unwrap());
    }
}
