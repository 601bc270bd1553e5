use crate::config::SiteProfile;
use crate::extract::Extractor;
use url::Url;

const CITY_OF_MOBILE_EVENT: &str = r#"<!DOCTYPE html>
<html>
<head><title>Summer Fest | City of Mobile</title></head>
<body>
  <div class="row">
    <div class="col-lg-9">
      <h1>
        Summer Fest
        <small>2025</small>
      </h1>
      <img src="/ImageRepository/Document?file=https://www.cityofmobile.org/uploads/summerfest.jpg">
      <p>When: <span itemprop="startDate">June 14, 2025 6:00 PM</span></p>
      <div itemprop="address">
        <span>Mardi Gras Park</span>
        <span>Mobile, AL 36602</span>
      </div>
      <span itemprop="description">Live music, food trucks and fireworks.</span>
    </div>
    <div class="col-lg-3"><a href="/events/">All events</a></div>
  </div>
</body>
</html>"#;

const USS_ALABAMA_EVENT: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Movie Night on the Fantail</h1>
  <h2>June 20 @ 7:00 pm - 10:00 pm</h2>
  <div class="tribe-events-event-image">
    <img src="https://www.ussalabama.com/wp-content/uploads/movie-night.jpg">
  </div>
  <div class="tribe-events-single-event-description">
    <p>Bring blankets and lawn chairs.</p>
    <p>Popcorn provided.</p>
  </div>
  <div class="tribe-events-meta-group">
    <dl>
      <dt>Date:</dt>
      <dd><abbr class="tribe-events-start-date">June 20</abbr></dd>
      <dt>Time:</dt>
      <dd><div class="tribe-events-start-time">7:00 pm - 10:00 pm</div></dd>
      <dt>Event Categories:</dt>
      <dd><a href="/events/category/family/" rel="tag">Family</a>, <a href="/events/category/outdoor/" rel="tag">Outdoor</a></dd>
    </dl>
  </div>
  <div class="tribe-events-meta-group">
    <h3>Venue</h3>
    <dd class="tribe-venue">USS ALABAMA Battleship Memorial Park</dd>
  </div>
  <div class="tribe-events-meta-group">
    <h3>Organizer</h3>
    <p>Phone: 251-433-2703</p>
    <p>Email: info@ussalabama.com</p>
  </div>
  <a href="https://prod5.agileticketing.net/websales/pages/info.aspx?evtinfo=4421">Buy Tickets</a>
</body>
</html>"#;

#[cfg(test)]
mod site_tests {
    use super::*;

    fn extractor(site: &str) -> Extractor {
        let profile = SiteProfile::builtin(site).unwrap();
        Extractor::new(profile.rules).unwrap()
    }

    #[test]
    fn test_city_of_mobile_event_page() {
        let url = Url::parse("https://www.cityofmobile.org/events/summer-fest").unwrap();
        let record = extractor("city-of-mobile").extract(CITY_OF_MOBILE_EVENT, &url);

        assert_eq!(record.title.as_deref(), Some("Summer Fest 2025"));
        assert_eq!(record.date_time.as_deref(), Some("June 14, 2025 6:00 PM"));
        assert_eq!(record.location.as_deref(), Some("Mardi Gras Park Mobile, AL 36602"));
        assert_eq!(record.venue_name, record.location);
        assert_eq!(
            record.description.as_deref(),
            Some("Live music, food trucks and fireworks.")
        );
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://www.cityofmobile.org/uploads/summerfest.jpg")
        );
        assert_eq!(record.page_url, "https://www.cityofmobile.org/events/summer-fest");
        assert_eq!(record.source_name, "City of Mobile");

        // Not part of this site's rules
        assert_eq!(record.categories, None);
        assert_eq!(record.phone, None);
    }

    #[test]
    fn test_city_of_mobile_sparse_page() {
        let url = Url::parse("https://www.cityofmobile.org/events/board-meeting").unwrap();
        let html = "<html><body><h1>Board Meeting</h1></body></html>";
        let record = extractor("city-of-mobile").extract(html, &url);

        assert_eq!(record.title.as_deref(), Some("Board Meeting"));
        assert_eq!(record.date_time, None);
        assert_eq!(record.location, None);
        assert_eq!(record.description, None);
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_uss_alabama_event_page() {
        let url = Url::parse("https://www.ussalabama.com/event/movie-night/").unwrap();
        let record = extractor("uss-alabama").extract(USS_ALABAMA_EVENT, &url);

        assert_eq!(record.title.as_deref(), Some("Movie Night on the Fantail"));
        assert_eq!(record.date_time.as_deref(), Some("June 20 @ 7:00 pm - 10:00 pm"));
        assert_eq!(record.date.as_deref(), Some("June 20"));
        assert_eq!(record.time.as_deref(), Some("7:00 pm - 10:00 pm"));
        assert_eq!(
            record.location.as_deref(),
            Some("USS ALABAMA Battleship Memorial Park")
        );
        assert_eq!(
            record.description.as_deref(),
            Some("Bring blankets and lawn chairs.\nPopcorn provided.")
        );
        assert_eq!(
            record.categories,
            Some(vec!["Family".to_string(), "Outdoor".to_string()])
        );
        assert_eq!(record.organiser.as_deref(), Some("Organizer"));
        assert_eq!(record.phone.as_deref(), Some("251-433-2703"));
        assert_eq!(record.email.as_deref(), Some("info@ussalabama.com"));
        assert_eq!(
            record.tickets_url.as_deref(),
            Some("https://prod5.agileticketing.net/websales/pages/info.aspx?evtinfo=4421")
        );
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://www.ussalabama.com/wp-content/uploads/movie-night.jpg")
        );
        assert_eq!(record.source_name, "USS Alabama");
    }

    #[test]
    fn test_uss_alabama_date_time_fallback() {
        let url = Url::parse("https://www.ussalabama.com/event/open-house/").unwrap();
        let html = "<h1>Open House</h1><h2>   </h2><header><h2>July 4</h2></header>";
        let record = extractor("uss-alabama").extract(html, &url);

        assert_eq!(record.date_time.as_deref(), Some("July 4"));
        assert_eq!(record.organiser, None);
        assert_eq!(record.phone, None);
        assert_eq!(record.email, None);
        assert_eq!(record.categories, None);
        assert_eq!(record.tickets_url, None);
    }
}
