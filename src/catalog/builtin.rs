//! built-in rule contexts shipped with fleetrule

use super::types::{OperatorType, RuleContext, ValueType, VariableDefinition};

lazy_static::lazy_static! {
    /// contexts every catalog starts from
    pub static ref BUILTIN_CONTEXTS: Vec<RuleContext> = builtin_contexts();
}

fn var(id: &str, name: &str, value_type: ValueType, category: &str) -> VariableDefinition {
    VariableDefinition::new(id, name, value_type, category)
}

// ============================================================================
// Shared variable groups
// ============================================================================

fn booking_variables() -> Vec<VariableDefinition> {
    vec![
        var("booking.status", "Booking status", ValueType::String, "booking")
            .with_description("Lifecycle state, e.g. pending, allocated, completed")
            .with_operators(vec![OperatorType::Eq, OperatorType::Ne, OperatorType::In]),
        var("booking.fare", "Fare", ValueType::Number, "booking")
            .with_description("Quoted or final fare in the account currency"),
        var("booking.passengers", "Passenger count", ValueType::Number, "booking"),
        var("booking.vehicleType", "Vehicle type", ValueType::String, "booking"),
        var("booking.pickupTime", "Pickup time", ValueType::Date, "booking"),
        var("booking.pickupZone", "Pickup zone", ValueType::String, "booking"),
        var("booking.dropoffZone", "Drop-off zone", ValueType::String, "booking"),
        var("booking.isAccount", "Account booking", ValueType::Boolean, "booking"),
        var("booking.isAirport", "Airport job", ValueType::Boolean, "booking"),
        var("booking.paymentMethod", "Payment method", ValueType::String, "payment")
            .with_operators(vec![OperatorType::Eq, OperatorType::Ne, OperatorType::In]),
        var("booking.attributes", "Attributes", ValueType::Array, "booking"),
    ]
}

fn customer_variables() -> Vec<VariableDefinition> {
    vec![
        var("customer.name", "Customer name", ValueType::String, "customer"),
        var("customer.email", "Customer email", ValueType::String, "customer"),
        var("customer.totalBookings", "Total bookings", ValueType::Number, "customer"),
        var("customer.isNew", "New customer", ValueType::Boolean, "customer"),
        var("customer.tags", "Customer tags", ValueType::Array, "customer"),
        var("customer.createdAt", "Signed up", ValueType::Date, "customer"),
    ]
}

fn driver_variables() -> Vec<VariableDefinition> {
    vec![
        var("driver.callsign", "Driver callsign", ValueType::String, "driver"),
        var("driver.rating", "Driver rating", ValueType::Number, "driver"),
        var("driver.isOnline", "Driver online", ValueType::Boolean, "driver"),
        var("vehicle.seats", "Vehicle seats", ValueType::Number, "vehicle"),
    ]
}

// ============================================================================
// Contexts
// ============================================================================

fn builtin_contexts() -> Vec<RuleContext> {
    let mut automation = booking_variables();
    automation.push(
        var("event.type", "Trigger event", ValueType::String, "event").with_operators(vec![
            OperatorType::Eq,
            OperatorType::Ne,
            OperatorType::In,
        ]),
    );
    automation.push(var("event.occurredAt", "Occurred at", ValueType::Date, "event"));
    automation.extend(driver_variables());

    let mut webhook = booking_variables();
    webhook.push(var("event.type", "Event type", ValueType::String, "event"));
    webhook.push(var("event.payload", "Payload", ValueType::Object, "event"));

    let mut attribute = booking_variables();
    attribute.extend(customer_variables());

    let mut message = booking_variables();
    message.extend(driver_variables());
    message.push(var("message.channel", "Channel", ValueType::String, "message"));

    let mut promotion = customer_variables();
    promotion.extend(vec![
        var("booking.fare", "Fare", ValueType::Number, "booking"),
        var("booking.pickupZone", "Pickup zone", ValueType::String, "booking"),
        var("booking.vehicleType", "Vehicle type", ValueType::String, "booking"),
        var("booking.pickupTime", "Pickup time", ValueType::Date, "booking"),
        var("booking.isAccount", "Account booking", ValueType::Boolean, "booking"),
    ]);

    vec![
        RuleContext::new(
            "booking_event",
            "Booking event",
            "Conditions evaluated when a booking changes state",
            booking_variables(),
        ),
        RuleContext::new(
            "automation_trigger",
            "Automation trigger",
            "Conditions gating an automation run",
            automation,
        ),
        RuleContext::new(
            "webhook_event",
            "Webhook event",
            "Conditions deciding whether a webhook fires",
            webhook,
        ),
        RuleContext::new(
            "attribute_auto_apply",
            "Attribute auto-apply",
            "Conditions that attach an attribute to a booking automatically",
            attribute,
        ),
        RuleContext::new(
            "message_template",
            "Message template",
            "Conditions selecting which message template is sent",
            message,
        ),
        RuleContext::new(
            "promotion_targeting",
            "Promotion targeting",
            "Conditions deciding which customers and bookings a promotion applies to",
            promotion,
        ),
    ]
}
