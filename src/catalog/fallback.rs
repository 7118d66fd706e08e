use chrono::NaiveTime;

use super::{DEFAULT_CURRENCY, ShuttleSchedule, Tour};
use crate::model::{FetchContext, NormalizedSeries};

struct TourSeed {
    title: &'static str,
    short: &'static str,
    full: &'static str,
    duration: &'static str,
    price: f64,
    images: &'static [&'static str],
    highlights: &'static [&'static str],
}

const TOURS: [TourSeed; 4] = [
    TourSeed {
        title: "Escapade à la Plage d'Antsanitia",
        short: "Découvrez les plages immaculées d'Antsanitia",
        full: "Évadez-vous vers les magnifiques plages d'Antsanitia, où les eaux cristallines rencontrent le sable blanc. Cette excursion d'une journée comprend la plongée avec masque et tuba, des activités de plage et un déjeuner traditionnel malgache avec des fruits de mer frais.",
        duration: "Journée complète (8 heures)",
        price: 75.0,
        images: &[
            "https://www.linfo.re/IMG/jpg/majunga-6.jpg",
            "https://images.pexels.com/photos/1450353/pexels-photo-1450353.jpeg",
        ],
        highlights: &[
            "Baignade dans des eaux cristallines",
            "Déjeuner de fruits de mer traditionnels",
            "Plongée parmi les poissons de récif colorés",
            "Détente sur une plage de sable blanc immaculée",
        ],
    },
    TourSeed {
        title: "Lac Sacré & Villages Locaux",
        short: "Découvrez la culture locale et le lac sacré",
        full: "Visitez le lac bleu sacré de Mangatsa et découvrez la vie authentique des villages. Rencontrez des artisans locaux, apprenez l'artisanat traditionnel et comprenez l'importance culturelle du lac pour le peuple malgache.",
        duration: "Demi-journée (4 heures)",
        price: 45.0,
        images: &[
            "https://images.pexels.com/photos/1579708/pexels-photo-1579708.jpeg",
            "https://images.pexels.com/photos/2901209/pexels-photo-2901209.jpeg",
        ],
        highlights: &[
            "Visite du lac bleu sacré",
            "Échange culturel avec les villageois",
            "Démonstrations d'artisanat traditionnel",
            "Dégustation de fruits et spécialités locales",
        ],
    },
    TourSeed {
        title: "Expédition sur le Fleuve Betsiboka",
        short: "Naviguez sur les eaux rouges du Betsiboka",
        full: "Voyagez le long des eaux rouges emblématiques du fleuve Betsiboka en pirogue traditionnelle. Observez des écosystèmes uniques, repérez des oiseaux endémiques et admirez les paysages spectaculaires formés par des décennies d'érosion.",
        duration: "Journée complète (9 heures)",
        price: 95.0,
        images: &[
            "https://images.pexels.com/photos/1761279/pexels-photo-1761279.jpeg",
            "https://images.pexels.com/photos/847393/pexels-photo-847393.jpeg",
        ],
        highlights: &[
            "Balade en pirogue traditionnelle",
            "Observation d'oiseaux",
            "Falaises rouges et paysages spectaculaires",
            "Pique-nique sur un banc de sable",
        ],
    },
    TourSeed {
        title: "Cirque Rouge & Grottes",
        short: "Explorez les merveilles géologiques de Majunga",
        full: "Découvrez les impressionnantes formations rocheuses rouges du Cirque Rouge et explorez des grottes anciennes aux caractéristiques géologiques uniques. Apprenez l'histoire riche de la région et les forces naturelles qui ont façonné ce paysage spectaculaire.",
        duration: "Journée complète (7 heures)",
        price: 85.0,
        images: &[
            "https://images.pexels.com/photos/2876098/pexels-photo-2876098.jpeg",
            "https://images.pexels.com/photos/1659438/pexels-photo-1659438.jpeg",
        ],
        highlights: &[
            "Formations rocheuses rouges spectaculaires",
            "Exploration de grottes anciennes",
            "Vues panoramiques sur la côte",
            "Explications sur l'histoire géologique",
        ],
    },
];

// departure, arrival, from, to, seats
const SHUTTLES: [((u32, u32), (u32, u32), &str, &str, u32); 8] = [
    ((8, 0), (8, 45), "Aéroport", "Ville de Majunga", 8),
    ((10, 30), (11, 15), "Aéroport", "Ville de Majunga", 12),
    ((14, 0), (14, 45), "Aéroport", "Ville de Majunga", 10),
    ((18, 30), (19, 15), "Aéroport", "Ville de Majunga", 6),
    ((7, 0), (7, 45), "Ville de Majunga", "Aéroport", 8),
    ((9, 30), (10, 15), "Ville de Majunga", "Aéroport", 12),
    ((13, 0), (13, 45), "Ville de Majunga", "Aéroport", 10),
    ((17, 30), (18, 15), "Ville de Majunga", "Aéroport", 6),
];

const SHUTTLE_PRICE: f64 = 15.0;

fn tour(id: u32, seed: &TourSeed) -> Tour {
    Tour {
        id,
        title: seed.title.to_string(),
        short_description: seed.short.to_string(),
        full_description: seed.full.to_string(),
        duration: seed.duration.to_string(),
        price: seed.price,
        currency: DEFAULT_CURRENCY.to_string(),
        images: seed.images.iter().map(|s| s.to_string()).collect(),
        highlights: seed.highlights.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in tour catalogue. Content is maintained in French only.
pub fn tour_fallback(_ctx: &FetchContext) -> NormalizedSeries<Tour> {
    let [head, tail @ ..] = &TOURS;
    NormalizedSeries::with_head(
        tour(1, head),
        tail.iter().zip(2..).map(|(seed, id)| tour(id, seed)),
    )
}

fn shuttle(id: u32, row: &((u32, u32), (u32, u32), &str, &str, u32)) -> ShuttleSchedule {
    let &((dh, dm), (ah, am), from, to, seats) = row;
    ShuttleSchedule {
        id,
        departure_time: NaiveTime::from_hms_opt(dh, dm, 0),
        arrival_time: NaiveTime::from_hms_opt(ah, am, 0),
        from: from.to_string(),
        to: to.to_string(),
        price: SHUTTLE_PRICE,
        currency: DEFAULT_CURRENCY.to_string(),
        available_seats: seats,
    }
}

/// Built-in airport/town shuttle timetable, airport departures first.
pub fn shuttle_fallback(_ctx: &FetchContext) -> NormalizedSeries<ShuttleSchedule> {
    let [head, tail @ ..] = &SHUTTLES;
    NormalizedSeries::with_head(
        shuttle(1, head),
        tail.iter().zip(2..).map(|(row, id)| shuttle(id, row)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use chrono::{FixedOffset, NaiveDate};

    fn ctx() -> FetchContext {
        FetchContext::new(
            Locale::Fr,
            NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
            FixedOffset::east_opt(3 * 3600).unwrap(),
        )
    }

    #[test]
    fn test_tour_fallback() {
        let tours = tour_fallback(&ctx());
        assert_eq!(tours.len(), 4);
        let ids: Vec<_> = tours.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(tours.as_slice()[3].price, 85.0);
        assert!(tours.iter().all(|t| t.highlights.len() == 4));
    }

    #[test]
    fn test_shuttle_fallback() {
        let shuttles = shuttle_fallback(&ctx());
        assert_eq!(shuttles.len(), 8);
        assert_eq!(shuttles.first().from, "Aéroport");
        assert_eq!(shuttles.as_slice()[7].id, 8);
        assert_eq!(shuttles.as_slice()[7].available_seats, 6);
        assert!(shuttles.iter().all(|s| s.price == 15.0));
    }
}
