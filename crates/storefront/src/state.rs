//! Application state.
//!
//! [`Storefront`] owns every piece of shopper state (catalog, cart,
//! wishlist, session, orders) along with the current search and filter
//! selection. Consumers receive it explicitly; nothing is global.

use rust_decimal::Decimal;
use tracing::instrument;

use nextshop_core::ProductId;

use crate::catalog::{Catalog, CatalogError, FilterCriteria, PriceRange};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{NewProduct, Order, Product, ProductUpdate, User};
use crate::services::analytics::SalesAnalytics;
use crate::services::auth::{AuthError, LoginOutcome, SessionManager, SessionStore};
use crate::services::cart::Cart;
use crate::services::checkout::{Checkout, CheckoutRequest, OrderQuote};
use crate::services::orders::{AccountSummary, OrderHistory};
use crate::services::wishlist::Wishlist;

/// The storefront application state.
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Cart,
    wishlist: Wishlist,
    session: SessionManager,
    orders: OrderHistory,
    checkout: Checkout,
    search: String,
    criteria: FilterCriteria,
}

impl Storefront {
    /// Create the state with the sample catalog, resuming any stored session.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Box<dyn SessionStore>) -> Self {
        Self::with_catalog(config, store, Catalog::seeded())
    }

    /// Create the state around an existing catalog.
    #[must_use]
    pub fn with_catalog(
        config: StorefrontConfig,
        store: Box<dyn SessionStore>,
        catalog: Catalog,
    ) -> Self {
        let session = SessionManager::restore(&config, store);
        let checkout = Checkout::new(&config);
        let criteria = catalog.open_criteria();
        Self {
            config,
            catalog,
            cart: Cart::new(),
            wishlist: Wishlist::new(),
            session,
            orders: OrderHistory::new(),
            checkout,
            search: String::new(),
            criteria,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    #[must_use]
    pub const fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Replace the whole filter selection.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria.price_range.is_inverted() {
            tracing::debug!("Price range low bound is above the high bound");
        }
        self.criteria = criteria;
    }

    /// Clear the search and reset filters to cover the whole catalog.
    pub fn reset_filters(&mut self) {
        self.search.clear();
        self.criteria = self.catalog.open_criteria();
    }

    /// Products matching the current search and filters.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.catalog.search(&self.search, &self.criteria)
    }

    // =========================================================================
    // Cart and wishlist
    // =========================================================================

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the id is not in the catalog.
    pub fn add_to_cart(&mut self, id: ProductId, quantity: u32) -> Result<()> {
        let product = self.catalog.get(id).ok_or(CatalogError::NotFound(id))?;
        self.cart.add(product, quantity);
        let id = id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        Ok(())
    }

    /// Toggle a catalog product on the wishlist. Returns whether it is saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the id is not in the catalog.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Result<bool> {
        let product = self.catalog.get(id).ok_or(CatalogError::NotFound(id))?;
        Ok(self.wishlist.toggle(product))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// # Errors
    ///
    /// See [`SessionManager::login`].
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginOutcome> {
        Ok(self.session.login(email, password).await?)
    }

    /// # Errors
    ///
    /// See [`SessionManager::register`].
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User> {
        Ok(self.session.register(name, email, password, confirm).await?)
    }

    /// # Errors
    ///
    /// See [`SessionManager::verify_second_factor`].
    pub fn verify_second_factor(&mut self, code: &str) -> Result<User> {
        Ok(self.session.verify_second_factor(code)?)
    }

    /// Sign out. The cart and wishlist are kept.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::logout`].
    pub fn logout(&mut self) -> Result<()> {
        Ok(self.session.logout()?)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Price the current cart with the chosen add-ons.
    #[must_use]
    pub fn quote(&self, request: &CheckoutRequest) -> OrderQuote {
        self.checkout
            .quote(&self.cart, request.carbon_offset, request.donation)
    }

    /// Place an order for the current cart as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` for any checkout rejection.
    #[instrument(skip_all)]
    pub async fn place_order(&mut self, request: CheckoutRequest) -> Result<Order> {
        let order = self
            .checkout
            .place_order(
                self.session.user(),
                &mut self.cart,
                &self.catalog,
                &mut self.orders,
                request,
            )
            .await?;
        let order_id = order.id.to_string();
        add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));
        Ok(order)
    }

    /// Totals over the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` when nobody is signed in.
    pub fn account_summary(&self) -> Result<AccountSummary> {
        let user = self.session.user().ok_or(AuthError::NotSignedIn)?;
        Ok(AccountSummary::for_user(&self.orders, user))
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// The signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` when nobody is signed in and
    /// `AppError::Forbidden` for a customer.
    pub fn require_admin(&self) -> Result<&User> {
        let user = self.session.user().ok_or(AuthError::NotSignedIn)?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Admin action refused");
            return Err(AppError::Forbidden("admin role required".to_string()));
        }
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins, or the catalog error.
    pub fn add_product(&mut self, new: NewProduct) -> Result<Product> {
        self.require_admin()?;
        let previous_max = self.catalog.max_price();
        let product = self.catalog.add(new)?;
        self.follow_price_ceiling(previous_max);
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins, or the catalog error.
    pub fn update_product(&mut self, id: ProductId, update: ProductUpdate) -> Result<Product> {
        self.require_admin()?;
        let previous_max = self.catalog.max_price();
        let product = self.catalog.update(id, update)?;
        self.follow_price_ceiling(previous_max);
        Ok(product)
    }

    /// Remove a product from the catalog. Cart and wishlist entries for it
    /// are left in place; checkout rejects them.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins, or the catalog error.
    pub fn remove_product(&mut self, id: ProductId) -> Result<Product> {
        self.require_admin()?;
        Ok(self.catalog.remove(id)?)
    }

    /// Store-wide sales figures.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admins.
    pub fn sales_analytics(&self) -> Result<SalesAnalytics> {
        self.require_admin()?;
        Ok(SalesAnalytics::compute(self.orders.orders(), &self.catalog))
    }

    /// Move an upper price bound left at the old catalog maximum to the new one.
    fn follow_price_ceiling(&mut self, previous_max: Decimal) {
        let max = self.catalog.max_price();
        let range = self.criteria.price_range;
        if range.high == previous_max && max > previous_max {
            tracing::debug!(%max, "Raising price filter ceiling");
            self.criteria = self
                .criteria
                .clone()
                .with_price_range(PriceRange::new(range.low, max));
        }
    }
}
