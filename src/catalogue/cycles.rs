//! Compliance cycle catalogue
//!
//! Checklist templates for the recurring MOE property maintenance cycles. A
//! template has no ids or dates; [`CycleTemplate::instantiate`] turns it into
//! a live cycle whose first period starts at the given instant. The same
//! template shape is read from the `[[cycles]]` tables of `portal.toml`.

use crate::{
    core::rollover::advance,
    models::{Frequency, MaintenanceCycle, Section, Task, new_id},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A checklist item without completion state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskTemplate {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionTemplate {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
}

/// A cycle definition: frequency plus the checklist reused every period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CycleTemplate {
    pub name: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionTemplate>,
}

impl CycleTemplate {
    /// Creates cycle number 1 with its first period starting at `now`.
    #[must_use]
    pub fn instantiate(&self, now: DateTime<Utc>) -> MaintenanceCycle {
        MaintenanceCycle {
            id: new_id(),
            name: self.name.clone(),
            frequency: self.frequency,
            reference: self.reference.clone(),
            current_cycle_start: now,
            current_cycle_end: advance(now, self.frequency),
            cycle_number: 1,
            last_rollover: None,
            sections: self
                .sections
                .iter()
                .map(|section| Section {
                    id: new_id(),
                    title: section.title.clone(),
                    category: section.category.clone(),
                    tasks: section
                        .tasks
                        .iter()
                        .map(|task| Task {
                            id: new_id(),
                            title: task.title.clone(),
                            description: task.description.clone(),
                            completed: false,
                            completed_by: None,
                            completed_at: None,
                            notes: None,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn section(title: &str, category: &str, tasks: &[(&str, &str)]) -> SectionTemplate {
    SectionTemplate {
        title: title.to_string(),
        category: category.to_string(),
        tasks: tasks
            .iter()
            .map(|(title, description)| TaskTemplate {
                title: (*title).to_string(),
                description: (*description).to_string(),
            })
            .collect(),
    }
}

fn cycle(
    name: &str,
    frequency: Frequency,
    reference: &str,
    sections: Vec<SectionTemplate>,
) -> CycleTemplate {
    CycleTemplate {
        name: name.to_string(),
        frequency,
        reference: Some(reference.to_string()),
        sections,
    }
}

/// The built-in compliance catalogue.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_cycle_templates() -> Vec<CycleTemplate> {
    vec![
        cycle(
            "Weekly Safety & Hygiene Checks",
            Frequency::Weekly,
            "MOE Property Guidelines - Regular Inspections",
            vec![
                section(
                    "Fire Safety",
                    "Safety",
                    &[
                        (
                            "Check all fire exits are clear and accessible",
                            "Ensure no obstructions in fire exit paths",
                        ),
                        (
                            "Test emergency lighting",
                            "Verify all emergency lights are functional",
                        ),
                        (
                            "Inspect fire extinguisher accessibility",
                            "All extinguishers visible and accessible",
                        ),
                        (
                            "Check fire alarm panel for faults",
                            "Review fire alarm panel for any fault indicators",
                        ),
                    ],
                ),
                section(
                    "General Hygiene",
                    "Hygiene",
                    &[
                        (
                            "Check toilet facilities are clean and stocked",
                            "Soap, paper towels, toilet paper adequate",
                        ),
                        (
                            "Verify hand sanitiser stations",
                            "All stations filled and operational",
                        ),
                        (
                            "Inspect rubbish and recycling bins",
                            "Bins emptied regularly, no overflow",
                        ),
                    ],
                ),
                section(
                    "Grounds Safety",
                    "Grounds",
                    &[
                        (
                            "Inspect playground equipment for damage",
                            "Check for sharp edges, loose bolts, wear",
                        ),
                        (
                            "Check pathways for trip hazards",
                            "Uneven surfaces, debris, wet areas",
                        ),
                        (
                            "Verify gate and fence integrity",
                            "All gates close properly, no fence gaps",
                        ),
                    ],
                ),
            ],
        ),
        cycle(
            "Monthly Building Systems",
            Frequency::Monthly,
            "MOE Preventive Maintenance Schedule",
            vec![
                section(
                    "HVAC Systems",
                    "Mechanical",
                    &[
                        (
                            "Check and replace HVAC filters",
                            "Inspect all air handling unit filters",
                        ),
                        (
                            "Test thermostat operation",
                            "Verify all zone thermostats respond correctly",
                        ),
                        (
                            "Inspect ductwork for leaks",
                            "Visual inspection of accessible ductwork",
                        ),
                        (
                            "Check ventilation rates in classrooms",
                            "MOE minimum fresh air requirements",
                        ),
                    ],
                ),
                section(
                    "Plumbing",
                    "Plumbing",
                    &[
                        (
                            "Check for leaking taps and pipes",
                            "Inspect all accessible plumbing",
                        ),
                        (
                            "Test hot water temperature (max 55°C)",
                            "MOE safety requirement for student areas",
                        ),
                        (
                            "Clean and inspect gutters",
                            "Remove debris, check for damage",
                        ),
                        ("Inspect stormwater drains", "Clear any blockages"),
                    ],
                ),
                section(
                    "Electrical",
                    "Electrical",
                    &[
                        (
                            "Test RCD/safety switches",
                            "All residual current devices functional",
                        ),
                        (
                            "Check switchboard for signs of overheating",
                            "Visual inspection of main switchboard",
                        ),
                        (
                            "Inspect external lighting",
                            "All security and pathway lights working",
                        ),
                    ],
                ),
            ],
        ),
        cycle(
            "Quarterly Compliance Checks",
            Frequency::Quarterly,
            "MOE School Property Guide - Compliance",
            vec![
                section(
                    "Building Warrant of Fitness (BWOF)",
                    "Compliance",
                    &[
                        (
                            "Review BWOF compliance schedule",
                            "Ensure all specified systems are maintained",
                        ),
                        (
                            "Fire alarm system full test",
                            "IQP certified test of fire alarm system",
                        ),
                        (
                            "Sprinkler system inspection",
                            "Flow test and visual inspection",
                        ),
                        (
                            "Emergency evacuation drill",
                            "Conduct and document evacuation drill",
                        ),
                        (
                            "Backflow preventer testing",
                            "Annual test due - quarterly check",
                        ),
                    ],
                ),
                section(
                    "Hazardous Materials",
                    "Safety",
                    &[
                        (
                            "Inspect asbestos register (if applicable)",
                            "Check condition of known asbestos materials",
                        ),
                        (
                            "Review chemical storage compliance",
                            "Science labs, cleaning supplies properly stored",
                        ),
                        (
                            "Check safety data sheets are current",
                            "All SDS accessible and up to date",
                        ),
                    ],
                ),
                section(
                    "Accessibility & Seismic",
                    "Structure",
                    &[
                        (
                            "Inspect accessible ramps and handrails",
                            "All accessibility features in good condition",
                        ),
                        (
                            "Check seismic restraints on equipment",
                            "Shelving, water heaters, heavy equipment secured",
                        ),
                        (
                            "Inspect building for structural cracks",
                            "Document any new or widening cracks",
                        ),
                    ],
                ),
            ],
        ),
        cycle(
            "Biannual Deep Maintenance",
            Frequency::Biannual,
            "MOE 5YA Property Plan",
            vec![
                section(
                    "Roof & Exterior",
                    "Building Envelope",
                    &[
                        (
                            "Professional roof inspection",
                            "Check for leaks, damage, moss, debris",
                        ),
                        (
                            "Inspect exterior cladding",
                            "Check for weathertightness issues",
                        ),
                        (
                            "Check window and door seals",
                            "Replace deteriorated seals",
                        ),
                        (
                            "Inspect and clean spouting",
                            "Clear all guttering and downpipes",
                        ),
                    ],
                ),
                section(
                    "Interior Maintenance",
                    "Interior",
                    &[
                        (
                            "Inspect flooring throughout",
                            "Check carpet, vinyl, tiles for damage",
                        ),
                        (
                            "Check interior paintwork",
                            "Touch up or repaint as needed",
                        ),
                        (
                            "Inspect ceiling tiles",
                            "Check for staining, damage, sagging",
                        ),
                        (
                            "Test all door hardware",
                            "Locks, closers, hinges operational",
                        ),
                    ],
                ),
            ],
        ),
        cycle(
            "Annual MOE Compliance Review",
            Frequency::Annual,
            "MOE Annual Property Review",
            vec![
                section(
                    "10-Year Property Plan (10YPP) Review",
                    "Planning",
                    &[
                        (
                            "Review current 10YPP status",
                            "Assess progress against 10-year property plan",
                        ),
                        (
                            "Update condition assessments",
                            "Re-evaluate building component conditions",
                        ),
                        (
                            "Review roll projections impact",
                            "Assess if student roll changes affect property needs",
                        ),
                        (
                            "Submit annual property report to MOE",
                            "Complete required MOE property reporting",
                        ),
                    ],
                ),
                section(
                    "5-Year Agreement (5YA) Funding",
                    "Funding",
                    &[
                        (
                            "Review 5YA funding allocation",
                            "Check remaining funds and planned expenditure",
                        ),
                        (
                            "Prioritise capital works projects",
                            "Rank upcoming projects by urgency and impact",
                        ),
                        (
                            "Update maintenance forecasting",
                            "Revise cost estimates for planned maintenance",
                        ),
                        (
                            "Review contractor performance",
                            "Assess quality and value of maintenance contractors",
                        ),
                    ],
                ),
                section(
                    "Health & Safety Annual Review",
                    "H&S",
                    &[
                        (
                            "Complete annual H&S site inspection",
                            "Comprehensive health and safety walkthrough",
                        ),
                        (
                            "Review and update emergency procedures",
                            "Earthquake, fire, lockdown procedures current",
                        ),
                        (
                            "Verify all compliance certificates current",
                            "BWOF, electrical WOF, gas certificates",
                        ),
                        (
                            "Review accident/incident register",
                            "Identify patterns and preventive actions",
                        ),
                        (
                            "Update building risk register",
                            "Reassess all property-related risks",
                        ),
                    ],
                ),
                section(
                    "Energy & Sustainability",
                    "Sustainability",
                    &[
                        (
                            "Review energy consumption data",
                            "Compare against previous years and benchmarks",
                        ),
                        (
                            "Inspect insulation condition",
                            "MOE minimum insulation standards met",
                        ),
                        (
                            "Check solar panel systems (if installed)",
                            "Performance review and maintenance",
                        ),
                        (
                            "Review water usage and conservation",
                            "Identify opportunities to reduce consumption",
                        ),
                    ],
                ),
            ],
        ),
    ]
}
