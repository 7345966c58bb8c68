use super::super::*;
use super::{command_failed_vec, debit_delta};

use guildmint_types::RoleGrant;

/// Catalog field limits shared by additem and edititem.
fn validate_text_fields(
    user: UserId,
    description: Option<&str>,
    image_url: Option<&str>,
) -> Option<Vec<Event>> {
    if description.is_some_and(|text| text.len() > guildmint_types::economy::MAX_DESCRIPTION_LENGTH)
    {
        return Some(command_failed_vec(
            user,
            guildmint_types::economy::ERROR_INVALID_ITEM,
            "Description is too long",
        ));
    }
    if image_url.is_some_and(|url| url.len() > guildmint_types::economy::MAX_IMAGE_URL_LENGTH) {
        return Some(command_failed_vec(
            user,
            guildmint_types::economy::ERROR_INVALID_ITEM,
            "Image URL is too long",
        ));
    }
    None
}

impl<'a, S: Store> Ledger<'a, S> {
    pub(in crate::ledger) async fn handle_buy(
        &mut self,
        envelope: &Envelope,
        item_name: &str,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let name = item_name.trim();

        let Some(mut item) = self.item(name).await? else {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_ITEM_NOT_FOUND,
                "No such item in the shop",
            ));
        };
        let mut account = self.account(user).await?;
        if account.balance < item.price {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INSUFFICIENT_FUNDS,
                "Insufficient balance for this item",
            ));
        }
        if let Some(cap) = item.stock_cap {
            if item.sold >= cap {
                return Ok(command_failed_vec(
                    user,
                    guildmint_types::economy::ERROR_OUT_OF_STOCK,
                    "This item is sold out",
                ));
            }
        }
        if let Some(cap) = item.user_cap {
            if account.quantity_of(name) >= cap {
                return Ok(command_failed_vec(
                    user,
                    guildmint_types::economy::ERROR_USER_CAP_REACHED,
                    "You already own the maximum of this item",
                ));
            }
        }

        let price = item.price;
        account.balance = account.balance.saturating_sub(price);
        account.grant_item(name);
        item.sold = item.sold.saturating_add(1);

        let balance = account.balance;
        let sold = item.sold;
        let remaining_stock = item.remaining_stock();
        let role_reward = item.role_reward;

        self.insert(Key::Account(user), Value::Account(account));
        self.insert(Key::Item(name.to_string()), Value::Item(item));

        self.audit(
            AuditKind::Buy,
            user,
            None,
            debit_delta(price),
            Some(name.to_string()),
            Some(format!("Bought {name}")),
        );

        tracing::info!(user = user.0, item = name, price, balance, "item purchased");

        Ok(vec![Event::ItemPurchased {
            user,
            item: name.to_string(),
            price,
            balance,
            sold,
            remaining_stock,
            role_grant: role_reward.map(|role| RoleGrant { user, role }),
        }])
    }

    #[allow(clippy::too_many_arguments)]
    pub(in crate::ledger) async fn handle_add_item(
        &mut self,
        envelope: &Envelope,
        name: &str,
        price: u64,
        description: Option<&str>,
        image_url: Option<&str>,
        stock_cap: Option<u32>,
        user_cap: Option<u32>,
        role_reward: Option<RoleId>,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let name = name.trim();

        if name.is_empty() {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_ITEM,
                "Item name cannot be empty",
            ));
        }
        if name.len() > guildmint_types::economy::MAX_ITEM_NAME_LENGTH {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_ITEM,
                "Item name is too long",
            ));
        }
        if price == 0 {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Price must be greater than zero",
            ));
        }
        if stock_cap == Some(0) {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Stock cap must be greater than zero",
            ));
        }
        if user_cap == Some(0) {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "User cap must be greater than zero",
            ));
        }
        if let Some(events) = validate_text_fields(user, description, image_url) {
            return Ok(events);
        }
        if self.item(name).await?.is_some() {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_ITEM_EXISTS,
                "An item with that name already exists",
            ));
        }

        let item = ShopItem {
            name: name.to_string(),
            price,
            description: description.map(str::to_string),
            image_url: image_url.map(str::to_string),
            stock_cap,
            user_cap,
            role_reward,
            sold: 0,
        };
        self.insert(Key::Item(name.to_string()), Value::Item(item));

        self.audit(
            AuditKind::AddItem,
            user,
            None,
            0,
            Some(name.to_string()),
            Some(format!("Added {name} to the shop")),
        );

        tracing::info!(admin = user.0, item = name, price, "shop item added");

        Ok(vec![Event::ItemAdded {
            name: name.to_string(),
            price,
        }])
    }

    #[allow(clippy::too_many_arguments)]
    pub(in crate::ledger) async fn handle_edit_item(
        &mut self,
        envelope: &Envelope,
        name: &str,
        price: Option<u64>,
        description: Option<&str>,
        image_url: Option<&str>,
        stock_cap: Option<u32>,
        user_cap: Option<u32>,
        role_reward: Option<RoleId>,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let name = name.trim();

        let Some(mut item) = self.item(name).await? else {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_ITEM_NOT_FOUND,
                "No such item in the shop",
            ));
        };
        if price == Some(0) {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_INVALID_AMOUNT,
                "Price must be greater than zero",
            ));
        }
        if let Some(events) = validate_text_fields(user, description, image_url) {
            return Ok(events);
        }

        if let Some(price) = price {
            item.price = price;
        }
        if let Some(description) = description {
            item.description = Some(description.to_string());
        }
        if let Some(image_url) = image_url {
            item.image_url = Some(image_url.to_string());
        }
        // A zero cap means "make it unlimited"; sold counts above a lowered cap
        // are tolerated and simply read as out of stock.
        if let Some(cap) = stock_cap {
            item.stock_cap = if cap == 0 { None } else { Some(cap) };
        }
        if let Some(cap) = user_cap {
            item.user_cap = if cap == 0 { None } else { Some(cap) };
        }
        if let Some(role) = role_reward {
            item.role_reward = Some(role);
        }
        self.insert(Key::Item(name.to_string()), Value::Item(item));

        self.audit(
            AuditKind::EditItem,
            user,
            None,
            0,
            Some(name.to_string()),
            Some(format!("Edited {name}")),
        );

        tracing::info!(admin = user.0, item = name, "shop item edited");

        Ok(vec![Event::ItemUpdated {
            name: name.to_string(),
        }])
    }

    pub(in crate::ledger) async fn handle_remove_item(
        &mut self,
        envelope: &Envelope,
        name: &str,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;
        let name = name.trim();

        if self.item(name).await?.is_none() {
            return Ok(command_failed_vec(
                user,
                guildmint_types::economy::ERROR_ITEM_NOT_FOUND,
                "No such item in the shop",
            ));
        }
        self.remove(&Key::Item(name.to_string()));

        self.audit(
            AuditKind::RemoveItem,
            user,
            None,
            0,
            Some(name.to_string()),
            Some(format!("Removed {name} from the shop")),
        );

        tracing::info!(admin = user.0, item = name, "shop item removed");

        Ok(vec![Event::ItemRemoved {
            name: name.to_string(),
        }])
    }

    pub(in crate::ledger) async fn handle_clear_shop(
        &mut self,
        envelope: &Envelope,
    ) -> Result<Vec<Event>> {
        let user = envelope.actor;

        let mut removed = 0u32;
        for (key, _) in self.scan(KeySpace::Items).await? {
            self.remove(&key);
            removed = removed.saturating_add(1);
        }

        self.audit(
            AuditKind::ClearShop,
            user,
            None,
            0,
            None,
            Some(format!("Cleared {removed} items from the shop")),
        );

        tracing::info!(admin = user.0, removed, "shop cleared");

        Ok(vec![Event::ShopCleared { removed }])
    }
}
