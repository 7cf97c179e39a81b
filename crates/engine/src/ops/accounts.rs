use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Account, Currency, DEFAULT_CURRENCY, DEFAULT_TIMEZONE, EngineError, ProfileUpdate,
    RegisterCmd, ResultEngine, accounts,
    util::{
        normalize_email, normalize_optional_text, normalize_required_name, normalize_timezone,
        validate_password,
    },
};

use super::{Engine, with_tx};

const INVALID_LOGIN: &str = "invalid email or password";

impl Engine {
    /// Registers a new account.
    ///
    /// The email is stored lowercased and must be unique; a duplicate is a
    /// `Conflict` and leaves the existing account untouched.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<Account> {
        let name = normalize_required_name(&cmd.name, "account")?;
        let email = normalize_email(&cmd.email)?;
        validate_password(&cmd.password)?;
        let password_hash = self.hasher.hash(&cmd.password).await?;

        with_tx!(self, |db_tx| {
            let exists = accounts::Entity::find()
                .filter(accounts::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict("email already registered".to_string()));
            }

            let model = accounts::ActiveModel {
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                profile_image_url: ActiveValue::Set(None),
                currency: ActiveValue::Set(DEFAULT_CURRENCY.to_string()),
                timezone: ActiveValue::Set(DEFAULT_TIMEZONE.to_string()),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_constraint(err, "email already registered"))?;

            tracing::info!("registered account {}", model.id);
            Account::try_from(model)
        })
    }

    /// Checks an email/password pair.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<Account> {
        let email = email.trim().to_lowercase();
        let model = with_tx!(self, |db_tx| {
            accounts::Entity::find()
                .filter(accounts::Column::Email.eq(email))
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        let Some(model) = model else {
            return Err(EngineError::Unauthorized(INVALID_LOGIN.to_string()));
        };
        if !self.hasher.verify(password, &model.password_hash).await? {
            return Err(EngineError::Unauthorized(INVALID_LOGIN.to_string()));
        }
        Account::try_from(model)
    }

    /// Loads an account by id.
    pub async fn account(&self, account_id: i64) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id).await?;
            Account::try_from(model)
        })
    }

    /// Applies the present fields of `update`; absent fields stay as they are.
    pub async fn update_profile(
        &self,
        account_id: i64,
        update: ProfileUpdate,
    ) -> ResultEngine<Account> {
        let unchanged = update.is_empty();
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "account"))
            .transpose()?;
        let currency = update
            .currency
            .as_deref()
            .map(Currency::try_from)
            .transpose()?;
        let timezone = update
            .timezone
            .as_deref()
            .map(normalize_timezone)
            .transpose()?;
        let profile_image_url = update
            .profile_image_url
            .map(|url| normalize_optional_text(url.as_deref()));

        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id).await?;
            if unchanged {
                return Account::try_from(model);
            }

            let mut active: accounts::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(currency) = currency {
                active.currency = ActiveValue::Set(currency.code().to_string());
            }
            if let Some(timezone) = timezone {
                active.timezone = ActiveValue::Set(timezone);
            }
            if let Some(url) = profile_image_url {
                active.profile_image_url = ActiveValue::Set(url);
            }
            let model = active.update(&db_tx).await?;
            Account::try_from(model)
        })
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        account_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        validate_password(new_password)?;
        let model = with_tx!(self, |db_tx| self.require_account(&db_tx, account_id).await)?;

        if !self
            .hasher
            .verify(current_password, &model.password_hash)
            .await?
        {
            return Err(EngineError::Unauthorized(
                "current password is incorrect".to_string(),
            ));
        }
        let password_hash = self.hasher.hash(new_password).await?;

        with_tx!(self, |db_tx| {
            let active = accounts::ActiveModel {
                id: ActiveValue::Set(account_id),
                password_hash: ActiveValue::Set(password_hash),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
