//! GraphQL documents sent by the resources.
//!
//! Field selections are shared through the `*_fields!` macros so every
//! operation returning a subscription decodes into the same record.

/// A named GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub operation_name: &'static str,
    /// Top-level field of `data` holding the operation's result.
    pub root_field: &'static str,
    pub query: &'static str,
}

macro_rules! product_fields {
    () => {
        "id title sku imageUrl priceCents priceExcludingTaxesCents taxPercentage \
         shopifyVariantId shopifyProductId productType supplier available interval \
         intervalUnitOfMeasure eligibleForDiscount metadata"
    };
}

macro_rules! plan_fields {
    () => {
        concat!(
            "id name slug currency monthlyAmountCents initialAmountIncludingTaxCents \
             minimumCommitmentEnabled minimumCommitmentPeriod available \
             planProducts { id quantity product { ",
            product_fields!(),
            " } }"
        )
    };
}

macro_rules! ordered_product_fields {
    () => {
        concat!(
            "id productId title quantity recurring interval intervalUnitOfMeasure \
             shipmentDate status priceIncludingTaxesCents totalAmountIncludingTaxCents \
             metadata plan { id name slug } product { ",
            product_fields!(),
            " }"
        )
    };
}

macro_rules! subscription_fields {
    () => {
        concat!(
            "id token status name lastName email phoneNumber address houseNumber zipcode \
             city country locale currency amountForStartingSubscriptionCents \
             monthlyAmountCents checkoutUrl selfServiceCenterUrl activatedAt nextOrderDate \
             metadata subscribedPlan { id plan { id name slug } } \
             appliedPromotions { id active promotion { id title percentage discountAmountCents active } } \
             extraFields { id extraFieldId fieldName value } \
             orderedProducts { ",
            ordered_product_fields!(),
            " }"
        )
    };
}

macro_rules! payload_errors {
    () => {
        "errors { attribute message path }"
    };
}

macro_rules! page_info {
    () => {
        "totalCount pageInfo { startCursor endCursor hasNextPage hasPreviousPage }"
    };
}

pub const GET_CURRENT_PROJECT: Document = Document {
    operation_name: "getCurrentProject",
    root_field: "currentProject",
    query: "query getCurrentProject { \
            currentProject { id name currency locale projectType taxPercentage countries \
            checkoutUrl selfServiceCenterUrl } }",
};

pub const GET_PRODUCTS: Document = Document {
    operation_name: "getProducts",
    root_field: "products",
    query: concat!(
        "query getProducts($first: Int, $after: String, $before: String, $last: Int, \
         $ids: [ID!], $sku: String, $shopifyVariantId: String, $available: Boolean) { \
         products(first: $first, after: $after, before: $before, last: $last, ids: $ids, \
         sku: $sku, shopifyVariantId: $shopifyVariantId, available: $available) { ",
        page_info!(),
        " nodes { ",
        product_fields!(),
        " } } }"
    ),
};

pub const GET_PRODUCT: Document = Document {
    operation_name: "getProduct",
    root_field: "getProduct",
    query: concat!(
        "query getProduct($id: ID!) { getProduct(id: $id) { ",
        product_fields!(),
        " } }"
    ),
};

pub const GET_PLANS: Document = Document {
    operation_name: "getPlans",
    root_field: "plans",
    query: concat!(
        "query getPlans($first: Int, $after: String, $before: String, $last: Int) { \
         plans(first: $first, after: $after, before: $before, last: $last) { ",
        page_info!(),
        " nodes { ",
        plan_fields!(),
        " } } }"
    ),
};

pub const GET_PLAN: Document = Document {
    operation_name: "getPlan",
    root_field: "getPlan",
    query: concat!(
        "query getPlan($id: ID, $slug: String) { getPlan(id: $id, slug: $slug) { ",
        plan_fields!(),
        " } }"
    ),
};

pub const GET_SUBSCRIPTION: Document = Document {
    operation_name: "getSubscription",
    root_field: "getSubscription",
    query: concat!(
        "query getSubscription($token: ID!) { getSubscription(token: $token) { ",
        subscription_fields!(),
        " } }"
    ),
};

pub const GET_SUBSCRIPTION_BY_SELF_SERVICE_CENTER_TOKEN: Document = Document {
    operation_name: "getSubscriptionBySelfServiceCenterLoginToken",
    root_field: "getSubscriptionBySelfServiceCenterLoginToken",
    query: concat!(
        "query getSubscriptionBySelfServiceCenterLoginToken($token: String!) { \
         getSubscriptionBySelfServiceCenterLoginToken(token: $token) { ",
        subscription_fields!(),
        " } }"
    ),
};

pub const CREATE_CART: Document = Document {
    operation_name: "createCart",
    root_field: "createCart",
    query: concat!(
        "mutation createCart { createCart(input: {}) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const CREATE_ORDERED_PRODUCT: Document = Document {
    operation_name: "createOrderedProduct",
    root_field: "createOrderedProduct",
    query: concat!(
        "mutation createOrderedProduct($input: CreateOrderedProductInput!) { \
         createOrderedProduct(input: $input) { orderedProduct { ",
        ordered_product_fields!(),
        " } subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const UPDATE_ORDERED_PRODUCT_QUANTITY: Document = Document {
    operation_name: "updateOrderedProductQuantity",
    root_field: "updateOrderedProductQuantity",
    query: concat!(
        "mutation updateOrderedProductQuantity($input: UpdateOrderedProductQuantityInput!) { \
         updateOrderedProductQuantity(input: $input) { orderedProduct { ",
        ordered_product_fields!(),
        " } subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const UPDATE_ORDERED_PRODUCT: Document = Document {
    operation_name: "updateOrderedProduct",
    root_field: "updateOrderedProduct",
    query: concat!(
        "mutation updateOrderedProduct($input: UpdateOrderedProductInput!) { \
         updateOrderedProduct(input: $input) { orderedProduct { ",
        ordered_product_fields!(),
        " } subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const DESTROY_ORDERED_PRODUCT: Document = Document {
    operation_name: "destroyOrderedProduct",
    root_field: "destroyOrderedProduct",
    query: concat!(
        "mutation destroyOrderedProduct($input: DestroyOrderedProductInput!) { \
         destroyOrderedProduct(input: $input) { orderedProduct { id } subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const UPDATE_ADDRESS_DETAILS: Document = Document {
    operation_name: "updateAddressDetails",
    root_field: "updateAddressDetails",
    query: concat!(
        "mutation updateAddressDetails($input: UpdateAddressDetailsInput!) { \
         updateAddressDetails(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const UPDATE_PLAN: Document = Document {
    operation_name: "updatePlan",
    root_field: "updatePlan",
    query: concat!(
        "mutation updatePlan($input: UpdatePlanInput!) { updatePlan(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const CREATE_SUBSCRIPTION_FROM_CART: Document = Document {
    operation_name: "createSubscriptionFromCart",
    root_field: "createSubscriptionFromCart",
    query: concat!(
        "mutation createSubscriptionFromCart($input: CreateSubscriptionFromCartInput!) { \
         createSubscriptionFromCart(input: $input) { paymentUrl returnUrl subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const UPDATE_SUBSCRIPTION: Document = Document {
    operation_name: "updateSubscription",
    root_field: "updateSubscription",
    query: concat!(
        "mutation updateSubscription($input: UpdateSubscriptionInput!) { \
         updateSubscription(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const APPLY_PROMOTION_TO_SUBSCRIPTION: Document = Document {
    operation_name: "applyPromotionToSubscription",
    root_field: "applyPromotionToSubscription",
    query: concat!(
        "mutation applyPromotionToSubscription($input: ApplyPromotionToSubscriptionInput!) { \
         applyPromotionToSubscription(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const PAUSE_SUBSCRIPTION: Document = Document {
    operation_name: "pauseSubscription",
    root_field: "pauseSubscription",
    query: concat!(
        "mutation pauseSubscription($input: PauseSubscriptionInput!) { \
         pauseSubscription(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const RESUME_SUBSCRIPTION: Document = Document {
    operation_name: "resumeSubscription",
    root_field: "resumeSubscription",
    query: concat!(
        "mutation resumeSubscription($input: ResumeSubscriptionInput!) { \
         resumeSubscription(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const CANCEL_SUBSCRIPTION: Document = Document {
    operation_name: "cancelSubscription",
    root_field: "cancelSubscription",
    query: concat!(
        "mutation cancelSubscription($input: CancelSubscriptionInput!) { \
         cancelSubscription(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};

pub const GET_INVOICES: Document = Document {
    operation_name: "getInvoices",
    root_field: "invoices",
    query: "query getInvoices($first: Int, $after: String, $before: String, $last: Int, \
            $subscriptionId: ID, $status: String, $includeRelated: Boolean = false) { \
            invoices(first: $first, after: $after, before: $before, last: $last, \
            subscriptionId: $subscriptionId, status: $status) { \
            totalCount pageInfo { startCursor endCursor hasNextPage hasPreviousPage } \
            nodes { id invoiceNumber status currency totalAmountIncludingTaxCents \
            totalTaxAmountCents subscriptionId createdAt dueDate paymentUrl \
            invoiceLineItems @include(if: $includeRelated) { id description quantity \
            totalAmountIncludingTaxCents } } } }",
};

pub const GET_DISCOUNT_CODE: Document = Document {
    operation_name: "getDiscountCode",
    root_field: "getDiscountCode",
    query: "query getDiscountCode($code: String!) { getDiscountCode(code: $code) { \
            id code active expiresAt promotion { id title percentage discountAmountCents active } } }",
};

pub const APPLY_DISCOUNT_CODE: Document = Document {
    operation_name: "applyDiscountCode",
    root_field: "applyDiscountCode",
    query: concat!(
        "mutation applyDiscountCode($input: ApplyDiscountCodeInput!) { \
         applyDiscountCode(input: $input) { subscription { ",
        subscription_fields!(),
        " } ",
        payload_errors!(),
        " } }"
    ),
};
