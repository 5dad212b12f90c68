//! Permissions granted by the authority and required by the drinks routes.

crate::permission!(
    /// Read drinks including full recipes.
    GetDrinksDetail => "get:drinks-detail"
);
crate::permission!(PostDrinks => "post:drinks");
crate::permission!(PatchDrinks => "patch:drinks");
crate::permission!(DeleteDrinks => "delete:drinks");
