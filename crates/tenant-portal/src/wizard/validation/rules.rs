use chrono::{Datelike, Utc};

use crate::wizard::domain::{
    ApplicationFormData, EmergencyContact, FormDate, Income, Occupant, Pet, ResidencyType,
    Residence, Vehicle,
};

use super::RuleSet;

const EARLIEST_VEHICLE_YEAR: i32 = 1900;

pub fn required(value: &str, label: &str) -> Option<String> {
    value
        .trim()
        .is_empty()
        .then(|| format!("{label} is required"))
}

pub fn required_date(value: Option<&FormDate>, label: &str) -> Option<String> {
    value.is_none().then(|| format!("{label} is required"))
}

/// Blank passes; use together with [`required`] when the field is mandatory.
pub fn email(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    (!valid).then(|| "Enter a valid email address".to_string())
}

/// Blank passes. Accepts common punctuation; requires 10 to 15 digits.
pub fn phone(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (!allowed || !(10..=15).contains(&digits)).then(|| "Enter a valid phone number".to_string())
}

pub fn year(value: &str) -> Option<String> {
    let latest = Utc::now().year() + 1;
    match value.trim().parse::<i32>() {
        Ok(year) if (EARLIEST_VEHICLE_YEAR..=latest).contains(&year) => None,
        _ => Some(format!(
            "Year must be between {EARLIEST_VEHICLE_YEAR} and {latest}"
        )),
    }
}

pub fn positive_amount(value: f64, label: &str) -> Option<String> {
    (!value.is_finite() || value <= 0.0).then(|| format!("{label} must be greater than zero"))
}

pub fn applicant_rules() -> RuleSet<ApplicationFormData> {
    RuleSet::new()
        .field("firstName", |f: &ApplicationFormData| {
            required(&f.first_name, "First name")
        })
        .field("lastName", |f: &ApplicationFormData| {
            required(&f.last_name, "Last name")
        })
        .field("email", |f: &ApplicationFormData| required(&f.email, "Email"))
        .field("email", |f: &ApplicationFormData| email(&f.email))
        .field("phoneNumber", |f: &ApplicationFormData| {
            required(&f.phone_number, "Phone number")
        })
        .field("phoneNumber", |f: &ApplicationFormData| phone(&f.phone_number))
        .field("dob", |f: &ApplicationFormData| {
            required_date(f.dob.as_ref(), "Date of birth")
        })
        .field("dob", |f: &ApplicationFormData| {
            f.dob
                .filter(|dob| *dob > Utc::now())
                .map(|_| "Date of birth cannot be in the future".to_string())
        })
        .field("moveInDate", |f: &ApplicationFormData| {
            required_date(f.move_in_date.as_ref(), "Move-in date")
        })
}

pub fn occupant_rules() -> RuleSet<Occupant> {
    RuleSet::new()
        .field("firstName", |o: &Occupant| required(&o.first_name, "First name"))
        .field("lastName", |o: &Occupant| required(&o.last_name, "Last name"))
        .field("email", |o: &Occupant| email(&o.email))
        .field("phoneNumber", |o: &Occupant| phone(&o.phone_number))
        .field("dob", |o: &Occupant| {
            required_date(o.dob.as_ref(), "Date of birth")
        })
        .field("relationship", |o: &Occupant| {
            required(&o.relationship, "Relationship")
        })
}

pub fn pet_rules() -> RuleSet<Pet> {
    RuleSet::new()
        .field("petType", |p: &Pet| required(&p.pet_type, "Pet type"))
        .field("name", |p: &Pet| required(&p.name, "Pet name"))
        .field("weight", |p: &Pet| required(&p.weight, "Weight"))
        .field("breed", |p: &Pet| required(&p.breed, "Breed"))
}

pub fn vehicle_rules() -> RuleSet<Vehicle> {
    RuleSet::new()
        .field("vehicleType", |v: &Vehicle| {
            required(&v.vehicle_type, "Vehicle type")
        })
        .field("make", |v: &Vehicle| required(&v.make, "Make"))
        .field("model", |v: &Vehicle| required(&v.model, "Model"))
        .field("year", |v: &Vehicle| required(&v.year, "Year"))
        .field("year", |v: &Vehicle| year(&v.year))
        .field("color", |v: &Vehicle| required(&v.color, "Color"))
        .field("licensePlate", |v: &Vehicle| {
            required(&v.license_plate, "License plate")
        })
        .field("registeredIn", |v: &Vehicle| {
            required(&v.registered_in, "Registration state")
        })
}

pub fn residence_rules() -> RuleSet<Residence> {
    RuleSet::new()
        .field("address", |r: &Residence| required(&r.address, "Address"))
        .field("city", |r: &Residence| required(&r.city, "City"))
        .field("state", |r: &Residence| required(&r.state, "State"))
        .field("zipCode", |r: &Residence| required(&r.zip_code, "Zip code"))
        .field("moveInDate", |r: &Residence| {
            required_date(r.move_in_date.as_ref(), "Move-in date")
        })
        .field("moveOutDate", |r: &Residence| {
            if r.residency_type == ResidencyType::Rent {
                required_date(r.move_out_date.as_ref(), "Move-out date")
            } else {
                None
            }
        })
        .field("moveOutDate", |r: &Residence| match (r.move_in_date, r.move_out_date) {
            (Some(move_in), Some(move_out)) if move_out < move_in => {
                Some("Move-out date must be after the move-in date".to_string())
            }
            _ => None,
        })
        .field("landlordName", |r: &Residence| {
            if r.residency_type == ResidencyType::Rent {
                required(&r.landlord_name, "Landlord name")
            } else {
                None
            }
        })
        .field("landlordEmail", |r: &Residence| email(&r.landlord_email))
        .field("landlordPhone", |r: &Residence| phone(&r.landlord_phone))
}

pub fn income_rules() -> RuleSet<Income> {
    RuleSet::new()
        .field("amount", |i: &Income| positive_amount(i.amount, "Amount"))
        .field("incomeType", |i: &Income| required(&i.income_type, "Income type"))
        .field("employer", |i: &Income| required(&i.employer, "Employer"))
        .field("startDate", |i: &Income| {
            i.start_date.is_none().then(|| "Start date is required".to_string())
        })
        .field("endDate", |i: &Income| match (i.start_date, i.end_date) {
            (Some(start), Some(end)) if end < start => {
                Some("End date must be after the start date".to_string())
            }
            _ => None,
        })
        .field("supervisorEmail", |i: &Income| email(&i.supervisor_email))
        .field("supervisorPhone", |i: &Income| phone(&i.supervisor_phone))
}

pub fn emergency_contact_rules() -> RuleSet<EmergencyContact> {
    RuleSet::new()
        .field("firstName", |c: &EmergencyContact| {
            required(&c.first_name, "First name")
        })
        .field("lastName", |c: &EmergencyContact| {
            required(&c.last_name, "Last name")
        })
        .field("relationship", |c: &EmergencyContact| {
            required(&c.relationship, "Relationship")
        })
        .field("email", |c: &EmergencyContact| email(&c.email))
        .field("phoneNumber", |c: &EmergencyContact| {
            required(&c.phone_number, "Phone number")
        })
        .field("phoneNumber", |c: &EmergencyContact| phone(&c.phone_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::domain::form_date;
    use chrono::NaiveDate;

    #[test]
    fn email_rule_accepts_plain_addresses() {
        assert_eq!(email(""), None);
        assert_eq!(email("jane@example.com"), None);
        assert!(email("jane@localhost").is_some());
        assert!(email("jane@@example.com").is_some());
        assert!(email("jane doe@example.com").is_some());
        assert!(email("@example.com").is_some());
    }

    #[test]
    fn phone_rule_counts_digits() {
        assert_eq!(phone("(515) 555-0134"), None);
        assert_eq!(phone("+1 515 555 0134"), None);
        assert!(phone("555-0134").is_some());
        assert!(phone("515-555-ABCD").is_some());
    }

    #[test]
    fn vehicle_year_is_bounded() {
        assert_eq!(year("2019"), None);
        assert!(year("1800").is_some());
        assert!(year("next").is_some());
    }

    #[test]
    fn move_out_date_only_required_when_renting() {
        let rules = residence_rules();
        let mut residence = Residence {
            move_in_date: form_date(2020, 1, 1),
            ..Residence::default()
        };
        assert_eq!(
            rules.check_field("moveOutDate", &residence).as_deref(),
            Some("Move-out date is required")
        );

        residence.set_residency_type(ResidencyType::Own);
        assert_eq!(rules.check_field("moveOutDate", &residence), None);
        assert_eq!(rules.check_field("landlordName", &residence), None);
    }

    #[test]
    fn residence_dates_must_be_ordered() {
        let residence = Residence {
            move_in_date: form_date(2022, 5, 1),
            move_out_date: form_date(2021, 5, 1),
            ..Residence::default()
        };
        assert_eq!(
            residence_rules()
                .check_field("moveOutDate", &residence)
                .as_deref(),
            Some("Move-out date must be after the move-in date")
        );
    }

    #[test]
    fn complete_income_passes() {
        let income = Income {
            amount: 4200.0,
            income_type: "Employment".to_string(),
            employer: "Hy-Vee".to_string(),
            start_date: NaiveDate::from_ymd_opt(2021, 3, 1),
            ..Income::default()
        };
        assert!(income_rules().check(&income).is_empty());

        let unpaid = Income {
            amount: 0.0,
            ..income
        };
        assert_eq!(
            income_rules().check(&unpaid).get("amount"),
            Some("Amount must be greater than zero")
        );
    }

    #[test]
    fn applicant_rules_flag_missing_fields() {
        let errors = applicant_rules().check(&ApplicationFormData::default());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("dob"), Some("Date of birth is required"));
    }
}
