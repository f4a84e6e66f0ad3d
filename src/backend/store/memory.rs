/**
 * In-Memory Record Store
 *
 * Dummy backend for local development and tests. It follows the PocketBase
 * contract closely enough that every flow behaves the same against it:
 * collection access rules, auth collections with hashed passwords, signed
 * session tokens and the same error classes.
 *
 * Everything lives in process memory and is wiped on restart.
 *
 * # Access Rules
 *
 * | Rule | Superuser | Authenticated | Anonymous |
 * |---|---|---|---|
 * | `None` | allowed | 403 | 403 |
 * | `""` | allowed | allowed | allowed |
 * | expression | allowed | allowed | list: empty, create: 403 |
 *
 * Updates and collection management are superuser-only.
 */
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{
    collections, Access, AuthSession, CollectionInfo, CollectionRules, CollectionSchema,
    FieldSpec, Filter, RecordStore, StoreError,
};
use crate::backend::auth::sessions::{create_token, verify_token, Claims, TOKEN_TTL_SECS};
use crate::backend::provision::schema::{messages_schema, rooms_schema};
use crate::shared::Record;

const SUPERUSER_ONLY: &str = "Only superusers can perform this action.";
const NOT_ALLOWED: &str = "You are not allowed to perform this request.";
const INVALID_TOKEN: &str = "The request requires valid record authorization token.";
const AUTH_FAILED: &str = "Failed to authenticate.";
const CREATE_FAILED: &str = "Failed to create record.";
const MISSING: &str = "The requested resource wasn't found.";
const NOT_UNIQUE: &str = "Value must be unique.";

/// Minimum password length accepted by auth collections
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Caller {
    Anonymous,
    User,
    Superuser,
}

/// Outcome of evaluating a collection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleCheck {
    Allowed,
    SuperuserOnly,
    NeedsAuth,
}

fn check_rule(rule: &Option<String>, caller: Caller) -> RuleCheck {
    match (caller, rule.as_deref()) {
        (Caller::Superuser, _) => RuleCheck::Allowed,
        (_, None) => RuleCheck::SuperuserOnly,
        (_, Some("")) => RuleCheck::Allowed,
        (Caller::User, Some(_)) => RuleCheck::Allowed,
        (Caller::Anonymous, Some(_)) => RuleCheck::NeedsAuth,
    }
}

#[derive(Debug)]
struct Collection {
    info: CollectionInfo,
    auth: bool,
    fields: Vec<FieldSpec>,
    records: Vec<Record>,
    /// bcrypt hashes of auth records, keyed by record ID
    password_hashes: HashMap<String, String>,
}

impl Collection {
    fn base(schema: CollectionSchema) -> Self {
        Self {
            info: CollectionInfo {
                id: format!("pbc_{}", schema.name),
                name: schema.name,
                rules: schema.rules,
            },
            auth: schema.kind == "auth",
            fields: schema.fields,
            records: Vec::new(),
            password_hashes: HashMap::new(),
        }
    }

    fn auth(name: &str, rules: CollectionRules) -> Self {
        Self::base(CollectionSchema {
            name: name.to_string(),
            kind: "auth".to_string(),
            fields: vec![
                FieldSpec::new("email", "email", true),
                FieldSpec::new("username", "text", false),
            ],
            rules,
        })
    }

    fn find_by_identity(&self, identity: &str) -> Option<&Record> {
        self.records.iter().find(|record| {
            record
                .str_field("email")
                .is_some_and(|email| email.eq_ignore_ascii_case(identity))
                || record.str_field("username") == Some(identity)
        })
    }

    fn taken(&self, field: &str, value: &str) -> bool {
        self.records.iter().any(|record| match record.str_field(field) {
            Some(existing) if field == "email" => existing.eq_ignore_ascii_case(value),
            Some(existing) => existing == value,
            None => false,
        })
    }
}

#[derive(Debug, Default)]
struct Inner {
    collections: Vec<Collection>,
}

impl Inner {
    fn get(&self, name_or_id: &str) -> Result<&Collection, StoreError> {
        self.collections
            .iter()
            .find(|c| c.info.name == name_or_id || c.info.id == name_or_id)
            .ok_or_else(|| StoreError::not_found("Missing collection context."))
    }

    fn get_mut(&mut self, name_or_id: &str) -> Result<&mut Collection, StoreError> {
        self.collections
            .iter_mut()
            .find(|c| c.info.name == name_or_id || c.info.id == name_or_id)
            .ok_or_else(|| StoreError::not_found("Missing collection context."))
    }
}

/// Process-local record store
#[derive(Debug)]
pub struct MemoryStore {
    secret: String,
    bcrypt_cost: u32,
    inner: RwLock<Inner>,
    live_tokens: RwLock<HashSet<String>>,
}

impl MemoryStore {
    /// Create a store with the chat collections in place
    ///
    /// # Arguments
    /// * `secret` - Secret used to sign issued tokens
    pub fn new(secret: impl Into<String>) -> Self {
        let rooms = Collection::base(rooms_schema());
        let messages = Collection::base(messages_schema(&rooms.info.id));
        let inner = Inner {
            collections: vec![
                Collection::auth(
                    collections::USERS,
                    CollectionRules {
                        list_rule: None,
                        view_rule: None,
                        create_rule: Some(String::new()),
                    },
                ),
                Collection::auth(collections::SUPERUSERS, CollectionRules::default()),
                rooms,
                messages,
            ],
        };

        Self {
            secret: secret.into(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            inner: RwLock::new(inner),
            live_tokens: RwLock::new(HashSet::new()),
        }
    }

    /// Override the bcrypt cost (tests use the minimum)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Seed a superuser account
    pub fn with_superuser(mut self, email: &str, password: &str) -> Self {
        let hash = match bcrypt::hash(password, self.bcrypt_cost) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, "Failed to hash superuser password");
                return self;
            }
        };

        if let Ok(superusers) = self.inner.get_mut().get_mut(collections::SUPERUSERS) {
            let mut fields = Map::new();
            fields.insert("email".to_string(), Value::from(email));
            fields.insert("created".to_string(), Value::from(timestamp()));
            let record = Record::new(new_record_id(), fields);
            superusers.password_hashes.insert(record.id.clone(), hash);
            superusers.records.push(record);
        }
        self
    }

    /// Number of live (issued, not revoked) tokens
    pub async fn live_token_count(&self) -> usize {
        self.live_tokens.read().await.len()
    }

    async fn caller(&self, access: Access<'_>) -> Result<Caller, StoreError> {
        let token = match access {
            Access::Anonymous => return Ok(Caller::Anonymous),
            Access::Token(token) => token,
        };

        let claims = verify_token(&self.secret, token)
            .map_err(|_| StoreError::forbidden(401, INVALID_TOKEN))?;
        if !self.live_tokens.read().await.contains(token) {
            return Err(StoreError::forbidden(401, INVALID_TOKEN));
        }

        Ok(if claims.collection == collections::SUPERUSERS {
            Caller::Superuser
        } else {
            Caller::User
        })
    }

    async fn require_superuser(&self, access: Access<'_>) -> Result<(), StoreError> {
        match self.caller(access).await? {
            Caller::Superuser => Ok(()),
            _ => Err(StoreError::forbidden(403, SUPERUSER_ONLY)),
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, StoreError> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(|e| StoreError::Upstream {
            status: 500,
            message: format!("password hashing failed: {e}"),
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn first_list_item(
        &self,
        collection: &str,
        filter: &Filter,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        let caller = self.caller(access).await?;
        let inner = self.inner.read().await;
        let target = inner.get(collection)?;

        match check_rule(&target.info.rules.list_rule, caller) {
            RuleCheck::SuperuserOnly => Err(StoreError::forbidden(403, SUPERUSER_ONLY)),
            // The rule filters out every record for guests
            RuleCheck::NeedsAuth => Err(StoreError::not_found(MISSING)),
            RuleCheck::Allowed => target
                .records
                .iter()
                .find(|record| filter.matches(record))
                .cloned()
                .ok_or_else(|| StoreError::not_found(MISSING)),
        }
    }

    async fn create_record(
        &self,
        collection: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        let caller = self.caller(access).await?;
        let Value::Object(body) = body else {
            return Err(StoreError::invalid(CREATE_FAILED));
        };
        let mut fields = body.clone();
        fields.remove("id");

        let (is_auth, required) = {
            let inner = self.inner.read().await;
            let target = inner.get(collection)?;
            match check_rule(&target.info.rules.create_rule, caller) {
                RuleCheck::Allowed => {}
                RuleCheck::SuperuserOnly => {
                    return Err(StoreError::forbidden(403, SUPERUSER_ONLY))
                }
                RuleCheck::NeedsAuth => return Err(StoreError::forbidden(403, NOT_ALLOWED)),
            }
            let required: Vec<String> = target
                .fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name.clone())
                .collect();
            (target.auth, required)
        };

        let missing = required.iter().any(|name| match fields.get(name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        });
        if missing {
            return Err(StoreError::invalid(CREATE_FAILED));
        }

        let hash = if is_auth {
            let password = fields
                .remove("password")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let confirm = fields
                .remove("passwordConfirm")
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            if password.len() < MIN_PASSWORD_LEN || password != confirm {
                return Err(StoreError::invalid(CREATE_FAILED));
            }
            Some(self.hash_password(&password)?)
        } else {
            None
        };

        let mut inner = self.inner.write().await;
        let target = inner.get_mut(collection)?;

        if is_auth {
            for field in ["email", "username"] {
                if let Some(value) = fields.get(field).and_then(Value::as_str) {
                    if target.taken(field, value) {
                        return Err(StoreError::duplicate(format!("{field}: {NOT_UNIQUE}")));
                    }
                }
            }
            if !fields.contains_key("username") {
                let generated = format!("users{}", &new_record_id()[..5]);
                fields.insert("username".to_string(), Value::from(generated));
            }
        }
        fields.insert("created".to_string(), Value::from(timestamp()));

        let record = Record::new(new_record_id(), fields);
        if let Some(hash) = hash {
            target.password_hashes.insert(record.id.clone(), hash);
        }
        target.records.push(record.clone());
        tracing::debug!(collection = %target.info.name, id = %record.id, "Memory store created record");
        Ok(record)
    }

    async fn update_record(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
        access: Access<'_>,
    ) -> Result<Record, StoreError> {
        self.require_superuser(access).await?;
        let Value::Object(body) = body else {
            return Err(StoreError::invalid("Failed to update record."));
        };

        let mut inner = self.inner.write().await;
        let target = inner.get_mut(collection)?;
        let record = target
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::not_found(MISSING))?;

        for (key, value) in body {
            if key != "id" && key != "password" && key != "passwordConfirm" {
                record.fields.insert(key.clone(), value.clone());
            }
        }
        record
            .fields
            .insert("updated".to_string(), Value::from(timestamp()));
        Ok(record.clone())
    }

    async fn auth_with_password(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let (record, hash) = {
            let inner = self.inner.read().await;
            let target = inner.get(collection)?;
            if !target.auth {
                return Err(StoreError::invalid(AUTH_FAILED));
            }
            let record = target
                .find_by_identity(identity)
                .cloned()
                .ok_or_else(|| StoreError::invalid(AUTH_FAILED))?;
            let hash = target
                .password_hashes
                .get(&record.id)
                .cloned()
                .ok_or_else(|| StoreError::invalid(AUTH_FAILED))?;
            (record, hash)
        };

        if !bcrypt::verify(password, &hash).unwrap_or(false) {
            return Err(StoreError::invalid(AUTH_FAILED));
        }

        let claims = Claims::new(record.id.clone(), collection, TOKEN_TTL_SECS);
        let token = create_token(&self.secret, &claims).map_err(|e| StoreError::Upstream {
            status: 500,
            message: format!("token signing failed: {e}"),
        })?;
        self.live_tokens.write().await.insert(token.clone());

        Ok(AuthSession { token, record })
    }

    async fn legacy_admin_auth(
        &self,
        _identity: &str,
        _password: &str,
    ) -> Result<AuthSession, StoreError> {
        Err(StoreError::not_found(MISSING))
    }

    async fn find_collection(
        &self,
        name: &str,
        access: Access<'_>,
    ) -> Result<Option<CollectionInfo>, StoreError> {
        self.require_superuser(access).await?;
        let inner = self.inner.read().await;
        Ok(inner.get(name).ok().map(|c| c.info.clone()))
    }

    async fn create_collection(
        &self,
        schema: &CollectionSchema,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError> {
        self.require_superuser(access).await?;
        let mut inner = self.inner.write().await;
        if inner.get(&schema.name).is_ok() {
            return Err(StoreError::invalid(format!(
                "Collection {} already defined.",
                schema.name
            )));
        }
        let collection = Collection::base(schema.clone());
        let info = collection.info.clone();
        inner.collections.push(collection);
        tracing::info!(collection = %info.name, "Memory store created collection");
        Ok(info)
    }

    async fn update_collection_rules(
        &self,
        id: &str,
        rules: &CollectionRules,
        access: Access<'_>,
    ) -> Result<CollectionInfo, StoreError> {
        self.require_superuser(access).await?;
        let mut inner = self.inner.write().await;
        let target = inner.get_mut(id)?;
        target.info.rules = rules.clone();
        Ok(target.info.clone())
    }

    async fn revoke_token(&self, token: &str) -> bool {
        self.live_tokens.write().await.remove(token)
    }
}

/// 15-character lowercase alphanumeric ID, like the ones PocketBase assigns
fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..15].to_string()
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
